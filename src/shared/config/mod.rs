//! Application configuration module
//!
//! Addresses of the primary and mirror backends plus the timing and size
//! limits of the branding subsystem. Built with [`AppConfigBuilder`] or
//! parsed from TOML:
//!
//! ```toml
//! poll_interval_ms = 5000
//! request_timeout_ms = 10000
//! max_logo_bytes = 2097152
//!
//! [primary]
//! base_url = "https://api.example.com"
//! description_field = "banner_image"
//!
//! [mirror]
//! base_url = "https://legacy.example.com/api"
//! description_field = "description"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::shared::customization::DescriptionField;

/// Default primary backend URL
pub const DEFAULT_PRIMARY_URL: &str = "http://127.0.0.1:3000";

/// Default status poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default logo size limit (2 MiB)
pub const DEFAULT_MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

/// One backend system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendEndpoint {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Wire name of the free-text/asset field on this backend
    #[serde(default)]
    pub description_field: DescriptionField,
}

impl BackendEndpoint {
    pub fn new(base_url: impl Into<String>, description_field: DescriptionField) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            description_field,
        }
    }

    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Authoritative backend
    pub primary: BackendEndpoint,
    /// Best-effort copy; `None` disables replication
    pub mirror: Option<BackendEndpoint>,
    /// Delay between status poll ticks
    pub poll_interval: Duration,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
    /// Largest accepted logo file
    pub max_logo_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            primary: BackendEndpoint::new(DEFAULT_PRIMARY_URL, DescriptionField::BannerImage),
            mirror: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_logo_bytes: DEFAULT_MAX_LOGO_BYTES,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.into_builder().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(&self.primary.base_url)?;
        if let Some(mirror) = &self.mirror {
            validate_url(&mirror.base_url)?;
            if mirror.base_url == self.primary.base_url {
                return Err(ConfigError::InvalidValue {
                    field: "mirror.base_url",
                    message: "mirror must be a different backend than primary".to_string(),
                });
            }
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.max_logo_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_logo_bytes",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| ConfigError::InvalidUrl(url.to_string()))?;
    if rest.is_empty() {
        return Err(ConfigError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

/// On-disk shape of the configuration
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    primary: Option<EndpointFile>,
    mirror: Option<EndpointFile>,
    poll_interval_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    max_logo_bytes: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EndpointFile {
    base_url: String,
    description_field: Option<DescriptionField>,
}

impl ConfigFile {
    fn into_builder(self) -> AppConfigBuilder {
        let mut builder = AppConfigBuilder::default();
        if let Some(primary) = self.primary {
            builder = builder.primary_url(primary.base_url);
            if let Some(field) = primary.description_field {
                builder = builder.primary_description_field(field);
            }
        }
        if let Some(mirror) = self.mirror {
            builder = builder.mirror_url(mirror.base_url);
            if let Some(field) = mirror.description_field {
                builder = builder.mirror_description_field(field);
            }
        }
        if let Some(ms) = self.poll_interval_ms {
            builder = builder.poll_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = self.request_timeout_ms {
            builder = builder.request_timeout(Duration::from_millis(ms));
        }
        if let Some(bytes) = self.max_logo_bytes {
            builder = builder.max_logo_bytes(bytes);
        }
        builder
    }
}

/// Builder for AppConfig
#[derive(Debug, Default, Clone)]
pub struct AppConfigBuilder {
    primary_url: Option<String>,
    primary_description_field: Option<DescriptionField>,
    mirror_url: Option<String>,
    mirror_description_field: Option<DescriptionField>,
    poll_interval: Option<Duration>,
    request_timeout: Option<Duration>,
    max_logo_bytes: Option<usize>,
}

impl AppConfigBuilder {
    /// Set the primary backend URL
    pub fn primary_url(mut self, url: impl Into<String>) -> Self {
        self.primary_url = Some(url.into());
        self
    }

    pub fn primary_description_field(mut self, field: DescriptionField) -> Self {
        self.primary_description_field = Some(field);
        self
    }

    /// Set the mirror backend URL
    pub fn mirror_url(mut self, url: impl Into<String>) -> Self {
        self.mirror_url = Some(url.into());
        self
    }

    pub fn mirror_description_field(mut self, field: DescriptionField) -> Self {
        self.mirror_description_field = Some(field);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn max_logo_bytes(mut self, bytes: usize) -> Self {
        self.max_logo_bytes = Some(bytes);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let primary = BackendEndpoint::new(
            self.primary_url.unwrap_or(defaults.primary.base_url),
            self.primary_description_field
                .unwrap_or(DescriptionField::BannerImage),
        );
        let mirror = self.mirror_url.filter(|u| !u.trim().is_empty()).map(|url| {
            BackendEndpoint::new(
                url,
                self.mirror_description_field
                    .unwrap_or(DescriptionField::Description),
            )
        });

        let config = AppConfig {
            primary,
            mirror,
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_logo_bytes: self.max_logo_bytes.unwrap_or(defaults.max_logo_bytes),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("failed to read configuration file: {0}")]
    Io(String),
}
