//! Shared application state handed to every handler and middleware.

use crate::auth::ProfileStore;
use crate::config::Config;
use roomly_access::RouteTable;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<ProfileStore>,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<ProfileStore>, routes: RouteTable) -> Self {
        Self {
            config: Arc::new(config),
            store,
            routes: Arc::new(routes),
        }
    }
}
