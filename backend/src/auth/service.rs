//! Core business logic for the authentication system.
//!
//! [`ProfileStore`] holds the token → account table. Until the first load
//! completes the store is not ready and every request resolves to a loading
//! session, which guarded routes answer with `503 Retry-After`.

use super::{AuthError, ProfileRecord, StoredAccount};
use async_trait::async_trait;
use roomly_access::{
    AccessError, IdentityProvider, Session, SessionResolver, UserIdentity, UserProfile,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct ProfileStore {
    accounts: RwLock<HashMap<String, StoredAccount>>,
    ready: AtomicBool,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            ready: AtomicBool::new(false),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub async fn load_file(&self, path: &Path) -> Result<usize, AuthError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AuthError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let records: Vec<ProfileRecord> = serde_json::from_str(&raw)?;
        let count = self.install(records).await?;
        info!(count, path = %path.display(), "profiles loaded");
        Ok(count)
    }

    /// Replaces the account table and marks the store ready. Nothing is
    /// installed if any record is invalid.
    pub async fn install(&self, records: Vec<ProfileRecord>) -> Result<usize, AuthError> {
        let mut accounts = HashMap::with_capacity(records.len());
        for record in records {
            let (token, account) = record.into_account()?;
            if accounts.contains_key(&token) {
                return Err(AuthError::DuplicateToken(account.identity.id));
            }
            accounts.insert(token, account);
        }
        let count = accounts.len();
        *self.accounts.write().await = accounts;
        self.ready.store(true, Ordering::Release);
        Ok(count)
    }

    pub async fn account(&self, token: &str) -> Option<StoredAccount> {
        self.accounts.read().await.get(token).cloned()
    }

    /// Drops `token`. Returns whether it was known.
    pub async fn revoke(&self, token: &str) -> bool {
        self.accounts.write().await.remove(token).is_some()
    }
}

/// Identity provider bound to one request's bearer token.
pub struct BearerIdentity {
    store: Arc<ProfileStore>,
    token: Option<String>,
}

impl BearerIdentity {
    pub fn new(store: Arc<ProfileStore>, token: Option<String>) -> Self {
        Self { store, token }
    }
}

#[async_trait]
impl IdentityProvider for BearerIdentity {
    async fn current_identity(&self) -> Result<Option<UserIdentity>, AccessError> {
        let Some(token) = &self.token else {
            return Ok(None);
        };
        Ok(self.store.account(token).await.map(|account| account.identity))
    }

    async fn fetch_profile(
        &self,
        identity: &UserIdentity,
    ) -> Result<Option<UserProfile>, AccessError> {
        let Some(token) = &self.token else {
            return Ok(None);
        };
        Ok(self
            .store
            .account(token)
            .await
            .filter(|account| account.identity.id == identity.id)
            .map(|account| account.profile))
    }

    async fn sign_out(&self) -> Result<(), AccessError> {
        if let Some(token) = &self.token {
            self.store.revoke(token).await;
        }
        Ok(())
    }
}

/// Resolver for a single request.
pub fn request_resolver(
    store: &Arc<ProfileStore>,
    token: Option<String>,
) -> SessionResolver<BearerIdentity> {
    SessionResolver::new(Arc::new(BearerIdentity::new(store.clone(), token)))
}

/// Session for a request carrying `token`.
pub async fn resolve_session(store: &Arc<ProfileStore>, token: Option<String>) -> Session {
    if !store.is_ready() {
        return Session::loading();
    }
    request_resolver(store, token)
        .resolve()
        .await
        .unwrap_or_else(|err| {
            warn!(%err, "session resolution failed");
            Session::anonymous()
        })
}
