//! Access core for the Roomly student-accommodation marketplace.
//!
//! This crate decides what happens when someone navigates to a protected
//! route: render it, send them somewhere else, or wait for their session to
//! resolve.
//!
//! # Architecture
//!
//! ```text
//! SessionResolver ──watch<Session>──► GuardedBoundary ──► Navigator
//!                                          │
//!                         RouteGuard ◄─────┘
//!                             │
//!                         role router (canonical_route, menu_for)
//! ```
//!
//! | Piece | Kind | Responsibility |
//! |-------|------|----------------|
//! | [`SessionResolver`] | Service | Owns the session, publishes snapshots |
//! | [`RouteGuard`] | Pure | `Session` + [`AccessPolicy`] → [`RedirectDecision`] |
//! | [`canonical_route`] | Pure | Role → landing route |
//! | [`dispatch_dashboard`] | Pure | Generic `/dashboard` entry dispatch |
//! | [`RouteTable`] | Registry | Path prefix → guard + policy |
//! | [`GuardedBoundary`] | Task | Re-evaluates on session change, drives navigation |
//!
//! Insufficient authorization is never an error: it always comes out as a
//! redirect. [`AccessError`] is reserved for malformed input and provider
//! failures.

pub mod boundary;
pub mod errors;
pub mod guard;
pub mod models;
pub mod resolver;
pub mod router;
pub mod routes;

// Re-exports for convenience
pub use boundary::{GuardedBoundary, Navigator};
pub use errors::AccessError;
pub use guard::{Frame, GuardKind, RedirectStrategy, RouteGuard};
pub use models::{
    paths, AccessPolicy, Permission, PermissionSet, RedirectDecision, Role, Session, UserIdentity,
    UserProfile,
};
pub use resolver::{IdentityProvider, SessionResolver};
pub use router::{canonical_route, canonical_route_for, dispatch_dashboard, menu_for, MenuItem};
pub use routes::{ProtectedRoute, RouteTable};
