/**
 * Server Initialization
 *
 * Builds the application state from `ServerConfig` and hands it to the
 * router. State is in memory only, so a restart starts empty.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing branding backend");
    let state = AppState::new(config);
    tracing::info!(
        "Uploads served from {}/uploads, limit {} bytes",
        state.public_base_url,
        state.max_upload_bytes
    );
    create_router(state)
}

/// Create the application around existing state
///
/// Lets callers keep a handle on the registry, e.g. to seed companies.
pub fn create_app_with_state(state: AppState) -> Router<()> {
    create_router(state)
}
