//! HTTP routes for authentication: the login landing page and sign-out.

use super::handlers::{login_handler, logout_handler};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_handler))
        .route("/logout", post(logout_handler))
}
