//! Custom error types specific to the `access` crate.
//!
//! Authorization outcomes are never errors: an insufficiently privileged
//! session produces a [`RedirectDecision`](crate::RedirectDecision). The
//! variants here cover validation of untrusted input (role and permission
//! strings, session parts, route registration) and failures reported by the
//! identity provider.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    #[error("unknown permission: '{0}'")]
    UnknownPermission(String),

    /// A resolved session carried a profile but no identity.
    #[error("resolved session has a profile but no identity")]
    ProfileWithoutIdentity,

    #[error("route '{0}' is already registered")]
    DuplicateRoute(String),

    #[error("invalid route '{0}': paths must start with '/'")]
    InvalidRoute(String),

    #[error("identity provider error: {0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_offending_value() {
        let err = AccessError::UnknownPermission("manage_everything".to_string());
        let msg = err.to_string();
        assert!(msg.contains("manage_everything"), "got: {msg}");

        let err = AccessError::InvalidRoute("admin".to_string());
        assert!(err.to_string().contains("must start with '/'"));
    }
}
