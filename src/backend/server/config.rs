/**
 * Server Configuration
 *
 * Loaded from environment variables (a `.env` file is read by the binary
 * first), with defaults for local development:
 *
 * - `SERVER_PORT` - listen port, default 3000
 * - `PUBLIC_BASE_URL` - base of upload URLs, default `http://127.0.0.1:{port}`
 * - `BRANDING_MAX_LOGO_BYTES` - upload limit, default 2 MiB
 *
 * Unparsable values are logged and replaced by the default; configuration
 * never prevents startup.
 */

use crate::shared::config::DEFAULT_MAX_LOGO_BYTES;

pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_PUBLIC_BASE_URL: &str = "PUBLIC_BASE_URL";
pub const ENV_MAX_LOGO_BYTES: &str = "BRANDING_MAX_LOGO_BYTES";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub public_base_url: Option<String>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            public_base_url: None,
            max_upload_bytes: DEFAULT_MAX_LOGO_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = parse_env(ENV_SERVER_PORT).unwrap_or(defaults.port);
        let max_upload_bytes = parse_env(ENV_MAX_LOGO_BYTES)
            .filter(|bytes: &usize| *bytes > 0)
            .unwrap_or(defaults.max_upload_bytes);
        let public_base_url = std::env::var(ENV_PUBLIC_BASE_URL)
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            port,
            public_base_url,
            max_upload_bytes,
        }
    }

    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://127.0.0.1:{}", self.port),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
