//! Configuration management for secret-link.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `PUBLIC_BASE_URL` - Optional. Origin used when building decrypt links
//!   (e.g. `https://share.example.com`). When unset, links are built from the
//!   request's `Host` header.
//! - `DEV_MODE` - Optional. Shows a "Return home" link on error pages.
//!   Defaults to `true` in debug builds and `false` in release builds.

use thiserror::Error;
use url::Url;

use crate::util::env_var_bool;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Public origin for generated links, without a trailing slash
    pub public_base_url: Option<String>,

    /// Development mode
    pub dev_mode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` is not a valid port or
    /// `PUBLIC_BASE_URL` is not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let public_base_url = match std::env::var("PUBLIC_BASE_URL") {
            Ok(value) if !value.trim().is_empty() => Some(parse_base_url(&value)?),
            _ => None,
        };

        let dev_mode = env_var_bool("DEV_MODE", cfg!(debug_assertions));

        Ok(Self {
            host,
            port,
            public_base_url,
            dev_mode,
        })
    }

    /// Create a config with default values (useful for testing).
    pub fn new() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_base_url: None,
            dev_mode: true,
        }
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidValue("PUBLIC_BASE_URL".to_string(), reason);

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    Ok(trimmed.to_string())
}
