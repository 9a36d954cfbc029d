//! Route guard: decides what a navigation attempt at a protected route does.
//!
//! # Precedence
//!
//! ```text
//! Resolving > Unauthenticated > super_admin bypass > RoleMismatch > PermissionDenied > Allowed
//!                                     (admin only)                     (admin only)
//! ```
//!
//! The role guard has no permission concept and stops at `RoleMismatch`.
//! The admin guard restricts to admins unless the policy names its own role
//! set, lets `super_admin` through before any role or permission test, and
//! sends admins lacking a specific permission to the admin dashboard.
//!
//! Evaluation is pure. Authentication fails closed (redirect to login); a
//! missing profile dispatches as the default role.

use crate::models::paths;
use crate::router::canonical_route;
use crate::{AccessPolicy, RedirectDecision, Role, Session};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which guard variant a route is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardKind {
    #[default]
    Role,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteGuard {
    kind: GuardKind,
}

impl RouteGuard {
    /// General role guard.
    #[must_use]
    pub fn role() -> Self {
        Self {
            kind: GuardKind::Role,
        }
    }

    /// Admin guard with the `super_admin` bypass and permission refinement.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            kind: GuardKind::Admin,
        }
    }

    #[must_use]
    pub fn kind(&self) -> GuardKind {
        self.kind
    }

    /// Evaluates `policy` against `session`.
    #[must_use]
    pub fn evaluate(&self, session: &Session, policy: &AccessPolicy) -> RedirectDecision {
        let decision = self.decide(session, policy);
        tracing::debug!(
            kind = ?self.kind,
            authenticated = session.is_authenticated(),
            role = %session.effective_role(),
            %decision,
            "route guard evaluated"
        );
        decision
    }

    fn decide(&self, session: &Session, policy: &AccessPolicy) -> RedirectDecision {
        if session.is_loading() {
            return RedirectDecision::Loading;
        }
        // Role and permission checks only apply to signed-in users.
        if !session.is_authenticated() {
            return if policy.requires_auth() {
                RedirectDecision::redirect(paths::LOGIN)
            } else {
                RedirectDecision::Allow
            };
        }

        let role = session.effective_role();
        let admin_permissions = session
            .profile()
            .filter(|p| p.role() == Role::Admin)
            .map(|p| p.permissions());

        if self.kind == GuardKind::Admin && admin_permissions.is_some_and(|p| p.is_super_admin()) {
            return RedirectDecision::Allow;
        }

        let admin_only = BTreeSet::from([Role::Admin]);
        let allowed = match (self.kind, policy.allowed_roles()) {
            (_, Some(roles)) => Some(roles),
            (GuardKind::Admin, None) => Some(&admin_only),
            (GuardKind::Role, None) => None,
        };
        if let Some(roles) = allowed {
            if !roles.contains(&role) {
                return RedirectDecision::redirect(canonical_route(role));
            }
        }

        if self.kind == GuardKind::Admin {
            if let (Some(required), Some(held)) =
                (policy.required_permission(), admin_permissions)
            {
                if !held.grants(required) {
                    return RedirectDecision::redirect(paths::ADMIN_DASHBOARD);
                }
            }
        }

        RedirectDecision::Allow
    }
}

/// How a redirect decision is presented while navigation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectStrategy {
    /// Swap the redirect in place of the content with no intermediate frame.
    #[default]
    Substitute,
    /// Render a blank frame first and navigate after it.
    Deferred,
}

impl RedirectStrategy {
    /// The frame a guarded boundary shows for `decision`.
    #[must_use]
    pub fn frame_for(&self, decision: RedirectDecision) -> Frame {
        match (decision, self) {
            (RedirectDecision::Allow, _) => Frame::Content,
            (RedirectDecision::Loading, _) => Frame::Placeholder,
            (RedirectDecision::Redirect(path), Self::Substitute) => Frame::Redirect(path),
            (RedirectDecision::Redirect(path), Self::Deferred) => Frame::Blank { pending: path },
        }
    }
}

impl FromStr for RedirectStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substitute" => Ok(Self::Substitute),
            "deferred" => Ok(Self::Deferred),
            other => Err(format!("unknown redirect strategy '{other}'")),
        }
    }
}

impl fmt::Display for RedirectStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substitute => f.write_str("substitute"),
            Self::Deferred => f.write_str("deferred"),
        }
    }
}

/// What a guarded boundary renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Content,
    Placeholder,
    Redirect(String),
    Blank { pending: String },
}

impl Frame {
    /// Path the navigator must be sent to, if any.
    #[must_use]
    pub fn navigation_target(&self) -> Option<&str> {
        match self {
            Self::Redirect(path) | Self::Blank { pending: path } => Some(path),
            Self::Content | Self::Placeholder => None,
        }
    }
}
