/**
 * Application State Management
 *
 * `AppState` is the state container shared by every handler:
 * - the customization registry (records, company domains, uploads)
 * - the public base URL used to build upload URLs
 * - the upload size limit
 *
 * The `FromRef` implementation lets handlers that only need the registry
 * extract it directly, following Axum's recommended pattern.
 */

use axum::extract::FromRef;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::customization::state::CustomizationRegistry;
use crate::backend::server::config::ServerConfig;

/// Shared handle to the registry
pub type RegistryHandle = Arc<RwLock<CustomizationRegistry>>;

#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: RegistryHandle,
    /// Base of the URLs handed out for uploaded logos, without trailing `/`
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            registry: Arc::new(RwLock::new(CustomizationRegistry::new())),
            public_base_url: config.public_base_url().trim_end_matches('/').to_string(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// URL an uploaded file is served under
    pub fn upload_url(&self, name: &str) -> String {
        format!("{}/uploads/{}", self.public_base_url, name)
    }
}

impl FromRef<AppState> for RegistryHandle {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.registry)
    }
}
