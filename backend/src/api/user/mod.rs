//! User profile endpoints, distinct from the authentication flow.

pub mod handlers;
