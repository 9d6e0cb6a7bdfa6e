//! Client configuration.

use std::time::Duration;

use spyglass_graphql::RetryPolicy;

use crate::error::ConfigError;

/// Endpoint env var consulted by [`SdkConfig::from_env`].
pub const ENDPOINT_ENV: &str = "SPYGLASS_ENDPOINT";
/// API key env var consulted by [`SdkConfig::from_env`].
pub const API_KEY_ENV: &str = "SPYGLASS_API_KEY";
/// Inter-page delay env var (milliseconds) consulted by [`SdkConfig::from_env`].
pub const PAGE_DELAY_ENV: &str = "SPYGLASS_PAGE_DELAY_MS";

const DEFAULT_ENDPOINT: &str = "https://api.spyglass.dev/graphql";

/// SDK configuration.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Bearer token attached to every request.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Pause between page requests during pagination.
    pub page_delay: Option<Duration>,
    /// Transport retry policy.
    pub retry: RetryPolicy,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            page_delay: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl SdkConfig {
    /// Build configuration from `SPYGLASS_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            config.api_key = Some(api_key);
        }
        if let Ok(delay_ms) = std::env::var(PAGE_DELAY_ENV) {
            let millis = delay_ms.parse::<u64>().map_err(|_| {
                ConfigError::new(format!("{PAGE_DELAY_ENV} must be an integer, got {delay_ms:?}"))
            })?;
            config.page_delay = Some(Duration::from_millis(millis));
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for problems.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::new("endpoint must not be empty"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::new(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SdkConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config = SdkConfig {
            endpoint: "ftp://example.com".to_string(),
            ..SdkConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
