//! Configuration management for Ordergate.
//!
//! Configuration is layered: built-in defaults, then an optional YAML file,
//! then `ORDERGATE__`-prefixed environment variables. Command-line flags are
//! applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;

use crate::error::{OrdergateError, Result};

/// Longest window accepted for the admission limiter (one year).
const MAX_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

/// Main configuration for the Ordergate service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdergateConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,

    /// API key authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,

    /// Path prefixes that skip admission control and authentication
    #[serde(default = "default_bypass_paths")]
    pub bypass_paths: Vec<String>,

    /// Include error type and message in 500 responses
    #[serde(default)]
    pub expose_internal_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            bypass_paths: default_bypass_paths(),
            expose_internal_errors: false,
        }
    }
}

fn default_http_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_bypass_paths() -> Vec<String> {
    vec!["/health".to_string()]
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Requests admitted per client in one window
    #[serde(default = "default_max_requests")]
    pub max_requests_per_window: u64,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often expired client windows are evicted, in seconds (0 disables)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: default_max_requests(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_max_requests() -> u64 {
    100
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_interval() -> u64 {
    60
}

/// API key authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Keys accepted in the `X-API-Key` header
    #[serde(default = "default_api_keys")]
    pub api_keys: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_keys: default_api_keys(),
        }
    }
}

fn default_api_keys() -> Vec<String> {
    vec!["dev-api-key-12345".to_string()]
}

impl OrdergateConfig {
    /// Load configuration from an optional YAML file plus the environment.
    ///
    /// Environment variables use the `ORDERGATE__` prefix and `__` between
    /// nested keys, e.g. `ORDERGATE__RATE_LIMITING__WINDOW_SECS=30`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            info!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: OrdergateConfig = builder
            .add_source(
                config::Environment::with_prefix("ORDERGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.bypass_paths")
                    .with_list_parse_key("auth.api_keys")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: OrdergateConfig = serde_yaml::from_str(yaml)
            .map_err(|e| OrdergateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        let rl = &self.rate_limiting;
        if rl.max_requests_per_window == 0 {
            return Err(OrdergateError::Config(
                "rate_limiting.max_requests_per_window must be greater than zero".to_string(),
            ));
        }
        if rl.window_secs == 0 || rl.window_secs > MAX_WINDOW_SECS {
            return Err(OrdergateError::Config(format!(
                "rate_limiting.window_secs must be between 1 and {}",
                MAX_WINDOW_SECS
            )));
        }
        if self.auth.api_keys.iter().all(|k| k.trim().is_empty()) {
            return Err(OrdergateError::Config(
                "auth.api_keys must contain at least one non-empty key".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrdergateConfig::default();
        assert_eq!(config.server.http_addr.port(), 5000);
        assert_eq!(config.rate_limiting.max_requests_per_window, 100);
        assert_eq!(config.rate_limiting.window_secs, 60);
        assert_eq!(config.server.bypass_paths, vec!["/health".to_string()]);
        assert!(!config.server.expose_internal_errors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
rate_limiting:
  max_requests_per_window: 3
auth:
  api_keys:
    - key-a
    - key-b
"#;
        let config = OrdergateConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.rate_limiting.max_requests_per_window, 3);
        assert_eq!(config.rate_limiting.window_secs, 60);
        assert_eq!(config.auth.api_keys.len(), 2);
        assert_eq!(config.server.http_addr.port(), 5000);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let yaml = r#"
rate_limiting:
  max_requests_per_window: 0
"#;
        let err = OrdergateConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, OrdergateError::Config(_)));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = OrdergateConfig::default();
        config.rate_limiting.window_secs = 0;
        assert!(config.validate().is_err());

        config.rate_limiting.window_secs = MAX_WINDOW_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_api_keys_rejected() {
        let mut config = OrdergateConfig::default();
        config.auth.api_keys = vec!["  ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_merges_file_and_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ordergate.yaml");
        std::fs::write(
            &path,
            r#"
server:
  bypass_paths:
    - /health
    - /metrics
rate_limiting:
  max_requests_per_window: 7
  window_secs: 90
"#,
        )
        .unwrap();

        std::env::set_var("ORDERGATE__RATE_LIMITING__WINDOW_SECS", "30");
        std::env::set_var("ORDERGATE__AUTH__API_KEYS", "k1,k2");
        let loaded = OrdergateConfig::load(Some(&path));
        std::env::remove_var("ORDERGATE__RATE_LIMITING__WINDOW_SECS");
        std::env::remove_var("ORDERGATE__AUTH__API_KEYS");

        let config = loaded.unwrap();
        assert_eq!(config.rate_limiting.max_requests_per_window, 7);
        assert_eq!(config.rate_limiting.window_secs, 30);
        assert_eq!(config.auth.api_keys, vec!["k1", "k2"]);
        assert_eq!(
            config.server.bypass_paths,
            vec!["/health".to_string(), "/metrics".to_string()]
        );
        assert_eq!(config.server.http_addr.port(), 5000);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        let err = OrdergateConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, OrdergateError::Config(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = OrdergateConfig::from_yaml("server: [not, a, map]").unwrap_err();
        assert!(matches!(err, OrdergateError::Config(_)));
    }
}
