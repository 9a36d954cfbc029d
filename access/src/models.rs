//! Data models shared by the router, the guard and the session resolver.
//!
//! Roles and permissions are closed enums. Anything arriving as a string
//! (profile rows, configuration, JSON) is parsed through [`FromStr`], so an
//! unknown permission is rejected where it enters the system instead of
//! silently failing a membership test later.

use crate::AccessError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Well-known navigation targets.
pub mod paths {
    pub const LOGIN: &str = "/auth/login";
    pub const DASHBOARD: &str = "/dashboard";
    pub const STUDENT_HOME: &str = "/dashboard/student";
    pub const AGENT_HOME: &str = "/agent";
    pub const ADMIN_HOME: &str = "/admin";
    /// Where admins lacking a specific permission are sent.
    pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
}

/// Closed category of user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Role {
    #[default]
    Student,
    Agent,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Agent, Role::Admin];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }

    /// Lenient parse for role claims coming from profile rows.
    ///
    /// Missing or unrecognized values degrade to [`Role::Student`].
    #[must_use]
    pub fn from_claim(raw: Option<&str>) -> Self {
        match raw.map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            Some(Err(err)) => {
                tracing::debug!(%err, "unrecognized role claim, treating as student");
                Role::default()
            }
            None => Role::default(),
        }
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "student" => Ok(Self::Student),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            other => Err(AccessError::UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = AccessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained admin capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Permission {
    /// Sentinel that bypasses every specific-permission check.
    SuperAdmin,
    ManageAgents,
    ManageProperties,
    ManageUsers,
    ManageBookings,
    ManageRoommates,
    ViewAnalytics,
    ManageSettings,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::SuperAdmin,
        Permission::ManageAgents,
        Permission::ManageProperties,
        Permission::ManageUsers,
        Permission::ManageBookings,
        Permission::ManageRoommates,
        Permission::ViewAnalytics,
        Permission::ManageSettings,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::ManageAgents => "manage_agents",
            Self::ManageProperties => "manage_properties",
            Self::ManageUsers => "manage_users",
            Self::ManageBookings => "manage_bookings",
            Self::ManageRoommates => "manage_roommates",
            Self::ViewAnalytics => "view_analytics",
            Self::ManageSettings => "manage_settings",
        }
    }
}

impl FromStr for Permission {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AccessError::UnknownPermission(s.to_string()))
    }
}

impl TryFrom<String> for Permission {
    type Error = AccessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of permissions held by a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.contains(Permission::SuperAdmin)
    }

    /// Whether `permission` is held, directly or through `super_admin`.
    #[must_use]
    pub fn grants(&self, permission: Permission) -> bool {
        self.is_super_admin() || self.contains(permission)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// Parses a list of permission strings, failing on the first unknown one.
    pub fn parse<I, S>(raw: I) -> Result<Self, AccessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(|s| s.as_ref().parse::<Permission>())
            .collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Authenticated identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserIdentity {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Profile attached to an identity.
///
/// The role has no setter: it stays fixed for the lifetime of the session
/// that carries the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    role: Role,
    #[serde(default)]
    permissions: PermissionSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            permissions: PermissionSet::new(),
            full_name: None,
        }
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Permissions only carry meaning for admins; other roles report an
    /// empty set regardless of what was stored.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        static EMPTY: PermissionSet = PermissionSet(BTreeSet::new());
        if self.role == Role::Admin {
            &self.permissions
        } else {
            &EMPTY
        }
    }

    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }
}

/// Resolved (or resolving) authentication state.
///
/// Fields are private so that a resolved session can never carry a profile
/// without an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Option<UserIdentity>,
    profile: Option<UserProfile>,
    loading: bool,
}

impl Session {
    /// Initial state before the resolver has reported anything.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: true,
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: false,
        }
    }

    #[must_use]
    pub fn authenticated(identity: UserIdentity, profile: Option<UserProfile>) -> Self {
        Self {
            identity: Some(identity),
            profile,
            loading: false,
        }
    }

    /// Builds a session from untrusted parts.
    ///
    /// A profile is kept while loading (a refresh in progress), but a
    /// resolved session with a profile and no identity is rejected.
    pub fn from_parts(
        identity: Option<UserIdentity>,
        profile: Option<UserProfile>,
        loading: bool,
    ) -> Result<Self, AccessError> {
        if !loading && identity.is_none() && profile.is_some() {
            return Err(AccessError::ProfileWithoutIdentity);
        }
        Ok(Self {
            identity,
            profile,
            loading,
        })
    }

    /// The same identity and profile, marked as resolving again.
    #[must_use]
    pub fn into_loading(self) -> Self {
        Self {
            loading: true,
            ..self
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Role used for dispatch; a missing profile counts as a student.
    #[must_use]
    pub fn effective_role(&self) -> Role {
        self.profile.as_ref().map(UserProfile::role).unwrap_or_default()
    }
}

/// Declarative access requirement attached to a protected route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    require_auth: bool,
    allowed_roles: Option<BTreeSet<Role>>,
    required_permission: Option<Permission>,
}

impl AccessPolicy {
    #[must_use]
    pub fn public() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated() -> Self {
        Self {
            require_auth: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn allow_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = Some(roles.into_iter().collect());
        self
    }

    #[must_use]
    pub fn require_permission(mut self, permission: Permission) -> Self {
        self.required_permission = Some(permission);
        self
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.require_auth
    }

    /// Allowed roles, or `None` when the policy does not restrict by role.
    /// An explicitly empty set is treated the same as no restriction.
    #[must_use]
    pub fn allowed_roles(&self) -> Option<&BTreeSet<Role>> {
        self.allowed_roles.as_ref().filter(|roles| !roles.is_empty())
    }

    #[must_use]
    pub fn required_permission(&self) -> Option<Permission> {
        self.required_permission
    }
}

/// Output of a guard evaluation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    Allow,
    Redirect(String),
    Loading,
}

impl RedirectDecision {
    #[must_use]
    pub fn redirect(path: impl Into<String>) -> Self {
        Self::Redirect(path.into())
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl fmt::Display for RedirectDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Redirect(path) => write!(f, "redirect({path})"),
            Self::Loading => f.write_str("loading"),
        }
    }
}
