//! Authentication module: bearer-token identities, profile loading and the
//! route guard middleware.
//!
//! Identities are looked up in an in-memory [`ProfileStore`](service::ProfileStore)
//! loaded from a JSON file at startup. Each request resolves its own
//! [`Session`](roomly_access::Session) through a
//! [`SessionResolver`](roomly_access::SessionResolver) bound to the request's
//! bearer token.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use middleware::*;
pub use models::*;
pub use routes::*;
pub use service::*;
