//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STAYBOOK_API_URL` - Base URL of the booking REST API
//!
//! ## Optional
//! - `STAYBOOK_HOST` - Bind address (default: 127.0.0.1)
//! - `STAYBOOK_PORT` - Listen port (default: 3000)
//! - `STAYBOOK_STORE_PATH` - Durable session/preferences file (default: staybook-store.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default durable store location, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "staybook-store.json";

const DEFAULT_PORT: u16 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Booking API base URL
    pub api_url: Url,
    /// Durable key-value file holding the session and favorites
    pub store_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Configuration with defaults for everything but the API URL.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            api_url,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("STAYBOOK_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("STAYBOOK_API_URL".to_string()))?;
        let api_url = Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STAYBOOK_API_URL".to_string(), e.to_string())
        })?;

        let mut config = Self::new(api_url);

        if let Some(host) = lookup("STAYBOOK_HOST") {
            config.host = host.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidEnvVar("STAYBOOK_HOST".to_string(), e.to_string())
            })?;
        }
        if let Some(port) = lookup("STAYBOOK_PORT") {
            config.port = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnvVar("STAYBOOK_PORT".to_string(), e.to_string())
            })?;
        }
        if let Some(path) = lookup("STAYBOOK_STORE_PATH").filter(|p| !p.trim().is_empty()) {
            config.store_path = PathBuf::from(path);
        }

        config.sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        config.sentry_environment = lookup("SENTRY_ENVIRONMENT");
        config.sentry_sample_rate = parse_sample_rate(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?;
        config.sentry_traces_sample_rate =
            parse_sample_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(config)
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse a sample rate in `0.0..=1.0`, falling back to `default` when unset.
fn parse_sample_rate<F>(lookup: &F, key: &str, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let rate: f32 = raw
        .parse()
        .map_err(|e: std::num::ParseFloatError| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }

    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_api_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "STAYBOOK_API_URL"));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("STAYBOOK_API_URL", "https://api.example.com")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STAYBOOK_API_URL", "https://api.example.com/v2/"),
            ("STAYBOOK_HOST", "0.0.0.0"),
            ("STAYBOOK_PORT", "8080"),
            ("STAYBOOK_STORE_PATH", "/tmp/staybook.json"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.api_url.as_str(), "https://api.example.com/v2/");
        assert_eq!(config.store_path, PathBuf::from("/tmp/staybook.json"));
        assert!(config.sentry_dsn.is_some());
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_values() {
        let base = ("STAYBOOK_API_URL", "https://api.example.com");

        assert!(matches!(
            load(&[("STAYBOOK_API_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[base, ("STAYBOOK_PORT", "99999")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[base, ("STAYBOOK_HOST", "localhost:3000")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[base, ("SENTRY_SAMPLE_RATE", "1.5")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }
}
