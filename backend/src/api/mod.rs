//! Central module for the application's HTTP surface.
//!
//! [`route_table`] is the single place where protected paths get their
//! guard and policy; [`build_router`] mounts the handlers and runs every
//! request through the guard middleware, which consults that table.

pub mod dashboard;
pub mod pages;
pub mod user;

use crate::auth::{auth_router, guard_middleware};
use crate::middleware::http_trace;
use crate::state::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use roomly_access::{paths, AccessError, AccessPolicy, Permission, Role, RouteGuard, RouteTable};

pub fn route_table() -> Result<RouteTable, AccessError> {
    let mut table = RouteTable::new();
    table
        .register(
            paths::STUDENT_HOME,
            RouteGuard::role(),
            AccessPolicy::authenticated().allow_roles([Role::Student]),
        )?
        .register(
            paths::AGENT_HOME,
            RouteGuard::role(),
            AccessPolicy::authenticated().allow_roles([Role::Agent]),
        )?
        .register("/profile", RouteGuard::role(), AccessPolicy::authenticated())?
        .register(paths::ADMIN_HOME, RouteGuard::admin(), AccessPolicy::authenticated())?
        .register(
            "/admin/agents",
            RouteGuard::admin(),
            AccessPolicy::authenticated().require_permission(Permission::ManageAgents),
        )?
        .register(
            "/admin/properties",
            RouteGuard::admin(),
            AccessPolicy::authenticated().require_permission(Permission::ManageProperties),
        )?
        .register(
            "/admin/users",
            RouteGuard::admin(),
            AccessPolicy::authenticated().require_permission(Permission::ManageUsers),
        )?;
    Ok(table)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route(paths::DASHBOARD, get(dashboard::dashboard_handler))
        .route(paths::STUDENT_HOME, get(pages::page_handler))
        .route(paths::AGENT_HOME, get(pages::page_handler))
        .route(paths::ADMIN_HOME, get(pages::page_handler))
        .route(paths::ADMIN_DASHBOARD, get(pages::page_handler))
        .route("/admin/agents", get(pages::page_handler))
        .route("/admin/properties", get(pages::page_handler))
        .route("/admin/users", get(pages::page_handler))
        .route("/profile", get(user::handlers::profile_handler))
        .nest("/auth", auth_router())
        .layer(from_fn_with_state(state.clone(), guard_middleware))
        .layer(http_trace())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Welcome to Roomly!"
}
