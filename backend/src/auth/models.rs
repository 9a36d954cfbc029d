//! Data structures for authentication-related entities.

use super::AuthError;
use roomly_access::{PermissionSet, Role, UserIdentity, UserProfile};
use serde::{Deserialize, Serialize};

/// One row of the profiles file.
///
/// The role is a loose claim and degrades to student when missing or
/// unrecognized. Permissions are validated strictly.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Identity and profile held for a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub identity: UserIdentity,
    pub profile: UserProfile,
}

impl ProfileRecord {
    pub fn into_account(self) -> Result<(String, StoredAccount), AuthError> {
        let permissions =
            PermissionSet::parse(&self.permissions).map_err(|source| AuthError::InvalidProfile {
                user_id: self.user_id.clone(),
                source,
            })?;

        let mut identity = UserIdentity::new(self.user_id);
        if let Some(email) = self.email {
            identity = identity.with_email(email);
        }

        let mut profile = UserProfile::new(Role::from_claim(self.role.as_deref()))
            .with_permissions(permissions.iter());
        if let Some(name) = self.full_name {
            profile = profile.with_full_name(name);
        }

        Ok((self.token, StoredAccount { identity, profile }))
    }
}

/// Body returned after a successful sign-out.
#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
    pub redirect: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomly_access::Permission;

    fn record(json: &str) -> ProfileRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn converts_admin_record() {
        let (token, account) = record(
            r#"{
                "token": "t-admin",
                "user_id": "u1",
                "email": "ops@roomly.test",
                "role": "admin",
                "permissions": ["manage_agents"]
            }"#,
        )
        .into_account()
        .unwrap();

        assert_eq!(token, "t-admin");
        assert_eq!(account.identity.email.as_deref(), Some("ops@roomly.test"));
        assert_eq!(account.profile.role(), Role::Admin);
        assert!(account.profile.permissions().contains(Permission::ManageAgents));
    }

    #[test]
    fn unknown_role_becomes_student() {
        let (_, account) = record(r#"{"token":"t","user_id":"u2","role":"landlord"}"#)
            .into_account()
            .unwrap();
        assert_eq!(account.profile.role(), Role::Student);
    }

    #[test]
    fn unknown_permission_is_rejected() {
        let err = record(r#"{"token":"t","user_id":"u3","role":"admin","permissions":["root"]}"#)
            .into_account()
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidProfile { ref user_id, .. } if user_id == "u3"));
    }
}
