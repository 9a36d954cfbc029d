//! Session resolver service.
//!
//! A single owned service publishes [`Session`] snapshots on a
//! [`tokio::sync::watch`] channel. Consumers hold a receiver from
//! [`SessionResolver::subscribe`]; there is no global auth state.
//!
//! Every `resolve` and `sign_out` takes a new epoch. A resolution only
//! publishes its result if its epoch is still current, so a slow fetch
//! that finishes after a sign-out cannot resurrect the old identity.

use crate::{AccessError, Session, UserIdentity, UserProfile};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Identity backend consumed by the resolver (hosted auth, token store, ...).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identity behind the current credentials, if any.
    async fn current_identity(&self) -> Result<Option<UserIdentity>, AccessError>;

    /// Profile row for `identity`. `Ok(None)` means the row does not exist.
    async fn fetch_profile(
        &self,
        identity: &UserIdentity,
    ) -> Result<Option<UserProfile>, AccessError>;

    /// Drops the current credentials.
    async fn sign_out(&self) -> Result<(), AccessError>;
}

pub struct SessionResolver<P> {
    provider: Arc<P>,
    sessions: watch::Sender<Session>,
    epoch: AtomicU64,
}

impl<P: IdentityProvider> SessionResolver<P> {
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        let (sessions, _) = watch::channel(Session::loading());
        Self {
            provider,
            sessions,
            epoch: AtomicU64::new(0),
        }
    }

    /// Subscribes to session changes. The receiver starts at the current
    /// snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sessions.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Session {
        self.sessions.borrow().clone()
    }

    /// Resolves identity and profile and publishes the result.
    ///
    /// Identity failures publish an anonymous session and return the error.
    /// Profile failures keep the identity without a profile.
    pub async fn resolve(&self) -> Result<Session, AccessError> {
        let epoch = self.begin();
        self.sessions.send_modify(|session| {
            *session = session.clone().into_loading();
        });

        let identity = match self.provider.current_identity().await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(%err, "identity lookup failed, treating session as anonymous");
                self.publish(epoch, Session::anonymous());
                return Err(err);
            }
        };

        let session = match identity {
            None => Session::anonymous(),
            Some(identity) => {
                let profile = match self.provider.fetch_profile(&identity).await {
                    Ok(profile) => profile,
                    Err(err) => {
                        tracing::warn!(%err, user = %identity.id, "profile fetch failed");
                        None
                    }
                };
                Session::authenticated(identity, profile)
            }
        };

        if self.publish(epoch, session.clone()) {
            tracing::info!(
                authenticated = session.is_authenticated(),
                role = %session.effective_role(),
                "session resolved"
            );
        }
        Ok(session)
    }

    /// Signs out and publishes an anonymous session, superseding any
    /// resolution still in flight.
    pub async fn sign_out(&self) -> Result<(), AccessError> {
        let epoch = self.begin();
        let result = self.provider.sign_out().await;
        if let Err(err) = &result {
            tracing::warn!(%err, "provider sign-out failed, dropping local session anyway");
        }
        if self.publish(epoch, Session::anonymous()) {
            tracing::info!("signed out");
        }
        result
    }

    fn begin(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes `session` if `epoch` is still the latest. Returns whether
    /// it was published.
    fn publish(&self, epoch: u64, session: Session) -> bool {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(epoch, "discarding superseded session resolution");
            return false;
        }
        self.sessions.send_replace(session);
        true
    }
}
