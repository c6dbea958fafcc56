//! Typed application configuration.
//!
//! Built once in `main` from the process environment and handed to the
//! router through state.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use casana_data::repository::RepositoryError;
use casana_domain::rules::ThresholdError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_APP_ENV: &str = "development";
pub const DEFAULT_VENDOR_TIMEOUT_SECS: u64 = 10;

/// Errors raised while building the configuration or the state derived from it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Could not read threshold file {path}: {source}")]
    ThresholdFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Thresholds(#[from] ThresholdError),

    #[error("Vendor source could not be configured: {0}")]
    Vendor(#[from] RepositoryError),
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Deployment environment reported by the health endpoint
    pub app_env: String,
    /// Vendor API root; the in-memory source is used when unset
    pub vendor_api_base_url: Option<String>,
    pub vendor_api_key: Option<String>,
    pub vendor_api_timeout: Duration,
    /// JSON file replacing the built-in threshold table
    pub thresholds_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            app_env: DEFAULT_APP_ENV.to_string(),
            vendor_api_base_url: None,
            vendor_api_key: None,
            vendor_api_timeout: Duration::from_secs(DEFAULT_VENDOR_TIMEOUT_SECS),
            thresholds_path: None,
        }
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = parse("HOST", &get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()))?;

        let port = match get("PORT") {
            Some(raw) => parse("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        let timeout_secs: u64 = match get("VENDOR_API_TIMEOUT_SECS") {
            Some(raw) => parse("VENDOR_API_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_VENDOR_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "VENDOR_API_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            app_env: get("APP_ENV").unwrap_or_else(|| DEFAULT_APP_ENV.to_string()),
            vendor_api_base_url: get("VENDOR_API_BASE_URL"),
            vendor_api_key: get("VENDOR_API_KEY"),
            vendor_api_timeout: Duration::from_secs(timeout_secs),
            thresholds_path: get("THRESHOLDS_PATH").map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| invalid(name, raw, e))
}

fn invalid(name: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_reads_every_variable() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("VENDOR_API_BASE_URL", "https://vendor.example.com/v2"),
            ("VENDOR_API_KEY", "secret"),
            ("VENDOR_API_TIMEOUT_SECS", "3"),
            ("THRESHOLDS_PATH", "/etc/casana/thresholds.json"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.app_env, "production");
        assert_eq!(config.vendor_api_base_url.as_deref(), Some("https://vendor.example.com/v2"));
        assert_eq!(config.vendor_api_key.as_deref(), Some("secret"));
        assert_eq!(config.vendor_api_timeout, Duration::from_secs(3));
        assert_eq!(config.thresholds_path, Some(PathBuf::from("/etc/casana/thresholds.json")));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("VENDOR_API_BASE_URL", "  "), ("PORT", "")]).unwrap();
        assert!(config.vendor_api_base_url.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        assert!(config_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_invalid_host_and_timeout() {
        assert!(config_from(&[("HOST", "not-an-ip")]).is_err());
        assert!(config_from(&[("VENDOR_API_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("VENDOR_API_TIMEOUT_SECS", "-1")]).is_err());
    }
}
