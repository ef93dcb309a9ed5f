use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::config::{AppConfig, AppConfigBuilder, BackendEndpoint, ConfigError};

/// Environment variable overriding the primary backend URL
pub const ENV_PRIMARY_URL: &str = "BRANDING_PRIMARY_URL";
/// Environment variable setting the mirror backend URL (empty disables it)
pub const ENV_MIRROR_URL: &str = "BRANDING_MIRROR_URL";
/// Environment variable overriding the poll interval in milliseconds
pub const ENV_POLL_INTERVAL_MS: &str = "BRANDING_POLL_INTERVAL_MS";
/// Environment variable overriding the request timeout in milliseconds
pub const ENV_REQUEST_TIMEOUT_MS: &str = "BRANDING_REQUEST_TIMEOUT_MS";

/// File name looked up in the user's config directory
const CONFIG_FILE_NAME: &str = "branding.toml";

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        let builder = apply_env(AppConfig::builder());
        let app = match builder.build() {
            Ok(app) => app,
            Err(e) => {
                tracing::warn!("Ignoring invalid branding environment: {}", e);
                AppConfig::default()
            }
        };
        Self { app }
    }
}

impl Config {
    /// Create a new configuration from defaults and environment overrides
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    pub fn from_app(app: AppConfig) -> Result<Self, ConfigError> {
        app.validate()?;
        Ok(Self { app })
    }

    /// Load `branding.toml` from the user's config directory when present,
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::new()),
        }
    }

    /// Load a TOML file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading branding config from {}", path.display());
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let file_config = AppConfig::from_toml_str(&source)?;

        let mut builder = AppConfig::builder()
            .primary_url(file_config.primary.base_url)
            .primary_description_field(file_config.primary.description_field)
            .poll_interval(file_config.poll_interval)
            .request_timeout(file_config.request_timeout)
            .max_logo_bytes(file_config.max_logo_bytes);
        if let Some(mirror) = file_config.mirror {
            builder = builder
                .mirror_url(mirror.base_url)
                .mirror_description_field(mirror.description_field);
        }

        Self::with_builder(apply_env(builder))
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn primary(&self) -> &BackendEndpoint {
        &self.app.primary
    }

    pub fn mirror(&self) -> Option<&BackendEndpoint> {
        self.app.mirror.as_ref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.app.poll_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.app.request_timeout
    }

    pub fn max_logo_bytes(&self) -> usize {
        self.app.max_logo_bytes
    }
}

/// `<config dir>/tenant-branding/branding.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tenant-branding").join(CONFIG_FILE_NAME))
}

fn apply_env(mut builder: AppConfigBuilder) -> AppConfigBuilder {
    if let Ok(url) = std::env::var(ENV_PRIMARY_URL) {
        builder = builder.primary_url(url);
    }
    if let Ok(url) = std::env::var(ENV_MIRROR_URL) {
        builder = builder.mirror_url(url);
    }
    if let Some(ms) = env_millis(ENV_POLL_INTERVAL_MS) {
        builder = builder.poll_interval(ms);
    }
    if let Some(ms) = env_millis(ENV_REQUEST_TIMEOUT_MS) {
        builder = builder.request_timeout(ms);
    }
    builder
}

fn env_millis(name: &str) -> Option<Duration> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!("{}='{}' is not a number of milliseconds", name, raw);
            None
        }
    }
}
