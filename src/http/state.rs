//! Shared state handed to every handler and middleware.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::OrdergateConfig;
use crate::orders::SalesOrderService;
use crate::ratelimit::{AdmissionLimiter, WindowConfig};

#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<AdmissionLimiter>,
    pub orders: Arc<SalesOrderService>,
    pub api_keys: Arc<HashSet<String>>,
    /// Path prefixes that skip admission control and authentication
    pub bypass_paths: Arc<Vec<String>>,
    pub expose_internal_errors: bool,
}

impl AppState {
    /// Assemble state from configuration and already-built components.
    pub fn new(
        config: &OrdergateConfig,
        limiter: Arc<AdmissionLimiter>,
        orders: Arc<SalesOrderService>,
    ) -> Self {
        let api_keys = config
            .auth
            .api_keys
            .iter()
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .collect();

        Self {
            limiter,
            orders,
            api_keys: Arc::new(api_keys),
            bypass_paths: Arc::new(config.server.bypass_paths.clone()),
            expose_internal_errors: config.server.expose_internal_errors,
        }
    }

    /// Build a limiter sized from the configuration.
    pub fn limiter_from_config(config: &OrdergateConfig) -> AdmissionLimiter {
        AdmissionLimiter::new(WindowConfig::new(
            config.rate_limiting.max_requests_per_window,
            config.rate_limiting.window_secs,
        ))
    }

    /// Whether `path` is one of the diagnostic endpoints.
    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_paths
            .iter()
            .any(|prefix| starts_with_segments(path, prefix))
    }

    pub fn is_valid_key(&self, key: &str) -> bool {
        self.api_keys.contains(key)
    }
}

/// Segment-aware prefix match: `/health` matches `/health` and
/// `/health/live` but not `/healthz`.
pub fn starts_with_segments(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_segments() {
        assert!(starts_with_segments("/health", "/health"));
        assert!(starts_with_segments("/health/live", "/health"));
        assert!(starts_with_segments("/health/", "/health/"));
        assert!(!starts_with_segments("/healthz", "/health"));
        assert!(!starts_with_segments("/api/health", "/health"));
        assert!(!starts_with_segments("/anything", "/"));
    }
}
