//! Role router: maps a role to its landing route and menu set, and dispatches
//! the generic `/dashboard` entry point.

use crate::models::paths;
use crate::{RedirectDecision, Role, Session};
use serde::Serialize;

/// Canonical landing route for a role.
#[must_use]
pub fn canonical_route(role: Role) -> &'static str {
    match role {
        Role::Admin => paths::ADMIN_HOME,
        Role::Agent => paths::AGENT_HOME,
        Role::Student => paths::STUDENT_HOME,
    }
}

/// Canonical route for a raw role claim. Missing or unknown roles land on
/// the student dashboard.
#[must_use]
pub fn canonical_route_for(raw: Option<&str>) -> &'static str {
    canonical_route(Role::from_claim(raw))
}

/// Decision for the generic dashboard entry route, used by links that do not
/// know the caller's role ahead of time.
#[must_use]
pub fn dispatch_dashboard(session: &Session) -> RedirectDecision {
    if session.is_loading() {
        return RedirectDecision::Loading;
    }
    if !session.is_authenticated() {
        return RedirectDecision::redirect(paths::LOGIN);
    }
    RedirectDecision::redirect(canonical_route(session.effective_role()))
}

/// Navigation entry in a role's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> MenuItem {
    MenuItem { label, path }
}

const STUDENT_MENU: &[MenuItem] = &[
    item("Dashboard", paths::STUDENT_HOME),
    item("Browse Properties", "/properties"),
    item("My Bookings", "/dashboard/student/bookings"),
    item("Roommate Matching", "/roommates"),
    item("Saved Properties", "/dashboard/student/saved"),
    item("Notifications", "/notifications"),
    item("Profile", "/profile"),
];

const AGENT_MENU: &[MenuItem] = &[
    item("Dashboard", paths::AGENT_HOME),
    item("My Listings", "/agent/properties"),
    item("Add Property", "/agent/properties/new"),
    item("Booking Requests", "/agent/bookings"),
    item("Verification", "/agent/verification"),
    item("Notifications", "/notifications"),
    item("Profile", "/profile"),
];

const ADMIN_MENU: &[MenuItem] = &[
    item("Overview", paths::ADMIN_HOME),
    item("Dashboard", paths::ADMIN_DASHBOARD),
    item("Agents", "/admin/agents"),
    item("Properties", "/admin/properties"),
    item("Users", "/admin/users"),
    item("Bookings", "/admin/bookings"),
    item("Settings", "/admin/settings"),
];

/// Menu set for a role. The first entry is always the role's canonical route.
#[must_use]
pub fn menu_for(role: Role) -> &'static [MenuItem] {
    match role {
        Role::Student => STUDENT_MENU,
        Role::Agent => AGENT_MENU,
        Role::Admin => ADMIN_MENU,
    }
}
