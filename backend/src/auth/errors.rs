//! Custom error types specific to authentication failures.

use roomly_access::AccessError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to read profiles from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed profiles file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid profile for user '{user_id}': {source}")]
    InvalidProfile {
        user_id: String,
        #[source]
        source: AccessError,
    },

    #[error("token for user '{0}' is already assigned")]
    DuplicateToken(String),

    #[error("missing bearer token")]
    MissingToken,
}
