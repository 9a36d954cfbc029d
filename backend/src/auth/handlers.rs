//! Handler functions for authentication-related API endpoints.

use super::{bearer_token, request_resolver, AuthError, SignOutResponse};
use crate::errors::AppError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use roomly_access::paths;
use serde_json::{json, Value};

/// Login page placeholder. Credential exchange happens at the hosted auth
/// provider; this only tells clients where they landed.
pub async fn login_handler() -> Json<Value> {
    Json(json!({ "page": "login", "path": paths::LOGIN }))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SignOutResponse>, AppError> {
    let token = bearer_token(&headers).ok_or(AuthError::MissingToken)?;
    request_resolver(&state.store, Some(token)).sign_out().await?;
    Ok(Json(SignOutResponse {
        signed_out: true,
        redirect: paths::LOGIN,
    }))
}
