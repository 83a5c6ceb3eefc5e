//! Public configuration for the catalog client.

use std::time::Duration;

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Configuration for the catalog client.
///
/// # Example
///
/// ```
/// use speechlink_api::ApiClientConfig;
/// use std::time::Duration;
///
/// let config = ApiClientConfig::new()
///     .with_api_key("xi-key")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub(crate) base_url: String,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
    /// Sent as `xi-api-key` when present
    pub(crate) api_key: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("speechlink-api/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
            api_key: None,
        }
    }
}

impl ApiClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the REST base URL (default `https://api.elevenlabs.io/v1`).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Per-request timeout. Defaults to 10 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiClientConfig::new();
        assert_eq!(config.base_url, "https://api.elevenlabs.io/v1");
        assert!(config.user_agent.contains("speechlink-api"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ApiClientConfig::new()
            .with_base_url("http://127.0.0.1:9000/v1")
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(2))
            .with_api_key("secret");

        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.api_key.as_deref(), Some("secret"));

        let cleared = config.with_optional_api_key(None);
        assert!(cleared.api_key.is_none());
    }
}
