//! Guarded page endpoints.
//!
//! Rendering is done by the client; these return the envelope it needs to
//! draw the page chrome for the caller's role.

use axum::extract::Extension;
use axum::http::Uri;
use axum::Json;
use roomly_access::{menu_for, MenuItem, Role, Session};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PageEnvelope {
    pub page: String,
    pub user_id: Option<String>,
    pub role: Role,
    pub menu: &'static [MenuItem],
}

pub async fn page_handler(uri: Uri, Extension(session): Extension<Session>) -> Json<PageEnvelope> {
    let role = session.effective_role();
    Json(PageEnvelope {
        page: uri.path().to_string(),
        user_id: session.identity().map(|identity| identity.id.clone()),
        role,
        menu: menu_for(role),
    })
}
