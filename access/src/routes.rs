//! Route table: access policies registered against path prefixes.
//!
//! Built once at startup and read-only afterwards. Lookups pick the longest
//! registered prefix that matches on a segment boundary, so `/admin` covers
//! `/admin/users` but not `/administrator`. Paths with no match are public.

use crate::guard::RouteGuard;
use crate::{AccessError, AccessPolicy};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub guard: RouteGuard,
    pub policy: AccessPolicy,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, ProtectedRoute>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        path: &str,
        guard: RouteGuard,
        policy: AccessPolicy,
    ) -> Result<&mut Self, AccessError> {
        if !path.starts_with('/') {
            return Err(AccessError::InvalidRoute(path.to_string()));
        }
        let key = normalize(path).to_string();
        if self.routes.contains_key(&key) {
            return Err(AccessError::DuplicateRoute(key));
        }
        tracing::debug!(path = %key, kind = ?guard.kind(), "registered protected route");
        self.routes.insert(key, ProtectedRoute { guard, policy });
        Ok(self)
    }

    /// Protected route governing `path`, if any.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&ProtectedRoute> {
        let mut candidate = normalize(path);
        loop {
            if let Some(route) = self.routes.get(candidate) {
                return Some(route);
            }
            if candidate == "/" {
                return None;
            }
            candidate = match candidate.rfind('/') {
                Some(0) => "/",
                Some(idx) => &candidate[..idx],
                None => return None,
            };
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Permission, Role};

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table
            .register("/admin", RouteGuard::admin(), AccessPolicy::authenticated())
            .unwrap()
            .register(
                "/admin/agents",
                RouteGuard::admin(),
                AccessPolicy::authenticated().require_permission(Permission::ManageAgents),
            )
            .unwrap()
            .register(
                "/agent",
                RouteGuard::role(),
                AccessPolicy::authenticated().allow_roles([Role::Agent]),
            )
            .unwrap();
        table
    }

    #[test]
    fn longest_prefix_wins() {
        let table = table();
        let route = table.lookup("/admin/agents/42").unwrap();
        assert_eq!(route.policy.required_permission(), Some(Permission::ManageAgents));

        let route = table.lookup("/admin/users").unwrap();
        assert_eq!(route.policy.required_permission(), None);
        assert_eq!(route.guard, RouteGuard::admin());
    }

    #[test]
    fn matches_on_segment_boundaries() {
        let table = table();
        assert!(table.lookup("/agents").is_none());
        assert!(table.lookup("/administrator").is_none());
        assert!(table.lookup("/agent/").is_some());
        assert!(table.lookup("/agent?tab=listings").is_some());
    }

    #[test]
    fn unregistered_paths_are_public() {
        let table = table();
        assert!(table.lookup("/").is_none());
        assert!(table.lookup("/properties/7").is_none());
    }

    #[test]
    fn duplicate_and_relative_paths_are_rejected() {
        let mut table = table();
        assert_eq!(
            table
                .register("/agent/", RouteGuard::role(), AccessPolicy::authenticated())
                .unwrap_err(),
            AccessError::DuplicateRoute("/agent".to_string())
        );
        assert_eq!(
            table
                .register("agent", RouteGuard::role(), AccessPolicy::authenticated())
                .unwrap_err(),
            AccessError::InvalidRoute("agent".to_string())
        );
        assert_eq!(table.len(), 3);
    }
}
