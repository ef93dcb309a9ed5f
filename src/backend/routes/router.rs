/**
 * Router Configuration
 *
 * Combines all route groups into a single Axum router:
 * 1. Customization routes (tenant endpoints, uploads, routing lookups)
 * 2. Administrator routes (grant unlock, register domain)
 * 3. Fallback handler (JSON 404)
 *
 * # Layers
 *
 * - Request body limit: the logo limit plus room for multipart framing.
 *   Axum's own default limit is disabled so this one applies everywhere.
 * - HTTP tracing via `tower_http::trace::TraceLayer`.
 */

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::customization_routes::{
    configure_admin_routes, configure_customization_routes,
};
use crate::backend::server::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let body_limit = app_state.max_upload_bytes + MULTIPART_OVERHEAD;

    let router = Router::new();
    let router = configure_customization_routes(router);
    let router = configure_admin_routes(router);

    router
        .fallback(|| async { BackendError::handler(StatusCode::NOT_FOUND, "Not found") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .with_state(app_state)
}
