//! Handler functions for the signed-in user's own profile.

use axum::extract::Extension;
use axum::Json;
use roomly_access::{canonical_route, Permission, Role, Session};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub home: &'static str,
}

impl From<&Session> for ProfileView {
    fn from(session: &Session) -> Self {
        let role = session.effective_role();
        let identity = session.identity();
        let profile = session.profile();
        Self {
            user_id: identity.map(|i| i.id.clone()),
            email: identity.and_then(|i| i.email.clone()),
            full_name: profile.and_then(|p| p.full_name().map(str::to_string)),
            role,
            permissions: profile.map(|p| p.permissions().iter().collect()).unwrap_or_default(),
            home: canonical_route(role),
        }
    }
}

pub async fn profile_handler(Extension(session): Extension<Session>) -> Json<ProfileView> {
    Json(ProfileView::from(&session))
}
