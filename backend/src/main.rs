//! Main entry point for the Roomly backend.
//!
//! Loads configuration, starts loading the profile store in the background,
//! registers the protected routes, and serves the API with axum. Guarded
//! routes answer `503` until the profiles are loaded.

mod api;
mod auth;
mod config;
mod errors;
mod middleware;
mod state;

use auth::ProfileStore;
use config::Config;
use errors::AppError;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let config = Config::from_env()?;
    let routes = api::route_table()?;
    let store = Arc::new(ProfileStore::new());

    tokio::spawn({
        let store = store.clone();
        let path = config.profiles_path.clone();
        async move {
            if let Err(err) = store.load_file(&path).await {
                tracing::error!(%err, "profiles failed to load; guarded routes stay unavailable");
            }
        }
    });

    let addr = config.addr;
    tracing::info!(
        %addr,
        protected_routes = routes.len(),
        strategy = %config.redirect_strategy,
        "starting Roomly backend"
    );

    let app = api::build_router(AppState::new(config, store, routes));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
