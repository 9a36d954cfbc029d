//! Generic `/dashboard` entry point that dispatches callers to their role
//! home.

use crate::auth::{bearer_token, frame_response, resolve_session};
use crate::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use roomly_access::dispatch_dashboard;

pub async fn dashboard_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = resolve_session(&state.store, bearer_token(&headers)).await;
    let frame = state
        .config
        .redirect_strategy
        .frame_for(dispatch_dashboard(&session));
    frame_response(frame).unwrap_or_else(|| StatusCode::NO_CONTENT.into_response())
}
