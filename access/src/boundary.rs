//! Guarded boundary: re-evaluates a route guard on every session change and
//! drives navigation.
//!
//! The most recent session wins. A redirect computed from a snapshot that has
//! since been superseded is dropped, and the same target is not navigated to
//! twice in a row.

use crate::guard::{Frame, RedirectStrategy, RouteGuard};
use crate::{AccessPolicy, Session};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Navigation collaborator that performs the actual route change.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, path: &str);
}

pub struct GuardedBoundary<N> {
    guard: RouteGuard,
    policy: AccessPolicy,
    strategy: RedirectStrategy,
    navigator: Arc<N>,
    sessions: watch::Receiver<Session>,
    frames: watch::Sender<Frame>,
    last_target: Option<String>,
}

impl<N: Navigator> GuardedBoundary<N> {
    #[must_use]
    pub fn new(
        sessions: watch::Receiver<Session>,
        guard: RouteGuard,
        policy: AccessPolicy,
        strategy: RedirectStrategy,
        navigator: Arc<N>,
    ) -> Self {
        let (frames, _) = watch::channel(Frame::Placeholder);
        Self {
            guard,
            policy,
            strategy,
            navigator,
            sessions,
            frames,
            last_target: None,
        }
    }

    /// Receiver for rendered frames.
    #[must_use]
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.subscribe()
    }

    /// Frame for `session` without touching navigation.
    #[must_use]
    pub fn render(&self, session: &Session) -> Frame {
        self.strategy
            .frame_for(self.guard.evaluate(session, &self.policy))
    }

    /// Runs until the session publisher goes away.
    pub async fn run(mut self) {
        loop {
            let frame = self.evaluate();
            self.apply(&frame).await;
            if self.sessions.changed().await.is_err() {
                tracing::debug!("session publisher dropped, guarded boundary stopping");
                break;
            }
        }
    }

    fn evaluate(&mut self) -> Frame {
        let session = self.sessions.borrow_and_update().clone();
        let frame = self.render(&session);
        self.frames.send_replace(frame.clone());
        frame
    }

    async fn apply(&mut self, frame: &Frame) {
        let Some(target) = frame.navigation_target() else {
            self.last_target = None;
            return;
        };
        if self.last_target.as_deref() == Some(target) {
            tracing::trace!(target, "redirect already applied");
            return;
        }
        if self.sessions.has_changed().unwrap_or(false) {
            tracing::debug!(target, "dropping redirect from superseded session");
            return;
        }
        tracing::debug!(target, strategy = %self.strategy, "navigating");
        self.navigator.navigate(target).await;
        self.last_target = Some(target.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::StaticProvider;
    use crate::{Role, SessionResolver, UserIdentity, UserProfile};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        fn visited(&self) -> Vec<String> {
            self.visited.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Navigator for RecordingNavigator {
        async fn navigate(&self, path: &str) {
            self.visited.lock().unwrap().push(path.to_string());
        }
    }

    fn student() -> Session {
        Session::authenticated(UserIdentity::new("s1"), Some(UserProfile::new(Role::Student)))
    }

    fn boundary(
        rx: watch::Receiver<Session>,
        strategy: RedirectStrategy,
    ) -> (GuardedBoundary<RecordingNavigator>, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let policy = AccessPolicy::authenticated().allow_roles([Role::Agent]);
        let boundary =
            GuardedBoundary::new(rx, RouteGuard::role(), policy, strategy, navigator.clone());
        (boundary, navigator)
    }

    #[tokio::test]
    async fn loading_renders_placeholder_without_navigation() {
        let (_tx, rx) = watch::channel(Session::loading());
        let (mut boundary, navigator) = boundary(rx, RedirectStrategy::Substitute);

        let frame = boundary.evaluate();
        boundary.apply(&frame).await;

        assert_eq!(frame, Frame::Placeholder);
        assert!(navigator.visited().is_empty());
    }

    #[tokio::test]
    async fn deferred_strategy_renders_blank_then_navigates() {
        let (_tx, rx) = watch::channel(Session::anonymous());
        let (mut boundary, navigator) = boundary(rx, RedirectStrategy::Deferred);
        let frames = boundary.frames();

        let frame = boundary.evaluate();
        assert_eq!(
            *frames.borrow(),
            Frame::Blank {
                pending: "/auth/login".to_string()
            }
        );
        boundary.apply(&frame).await;
        assert_eq!(navigator.visited(), vec!["/auth/login".to_string()]);
    }

    #[tokio::test]
    async fn stale_redirect_is_suppressed() {
        let (tx, rx) = watch::channel(Session::anonymous());
        let (mut boundary, navigator) = boundary(rx, RedirectStrategy::Substitute);

        let stale = boundary.evaluate();
        tx.send(student()).unwrap();
        boundary.apply(&stale).await;
        assert!(navigator.visited().is_empty());

        let fresh = boundary.evaluate();
        boundary.apply(&fresh).await;
        assert_eq!(navigator.visited(), vec!["/dashboard/student".to_string()]);
    }

    #[tokio::test]
    async fn repeated_target_is_applied_once() {
        let (tx, rx) = watch::channel(Session::anonymous());
        let (mut boundary, navigator) = boundary(rx, RedirectStrategy::Substitute);

        let frame = boundary.evaluate();
        boundary.apply(&frame).await;
        tx.send(Session::anonymous()).unwrap();
        let frame = boundary.evaluate();
        boundary.apply(&frame).await;

        assert_eq!(navigator.visited().len(), 1);
    }

    #[tokio::test]
    async fn run_follows_resolver_until_dropped() {
        let resolver = SessionResolver::new(Arc::new(StaticProvider::signed_in(Role::Agent)));
        let (boundary, navigator) = boundary(resolver.subscribe(), RedirectStrategy::Substitute);
        let mut frames = boundary.frames();
        let task = tokio::spawn(boundary.run());

        resolver.resolve().await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), frames.wait_for(|f| *f == Frame::Content))
            .await
            .expect("boundary never rendered content")
            .unwrap();

        resolver.sign_out().await.unwrap();
        tokio::time::timeout(
            Duration::from_secs(1),
            frames.wait_for(|f| *f == Frame::Redirect("/auth/login".to_string())),
        )
        .await
        .expect("boundary never redirected")
        .unwrap();

        drop(resolver);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("boundary did not stop")
            .unwrap();
        assert_eq!(navigator.visited().last().map(String::as_str), Some("/auth/login"));
    }
}
