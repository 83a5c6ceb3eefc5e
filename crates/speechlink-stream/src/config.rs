//! Public configuration for streaming sessions.

use speechlink_core::ContextMode;

/// Default WebSocket base URL.
pub const DEFAULT_BASE_URL: &str = "wss://api.elevenlabs.io/v1";

/// Default seconds of silence before the service drops the connection.
pub const DEFAULT_INACTIVITY_TIMEOUT: u32 = 180;

/// Configuration shared by every session a [`StreamClient`] opens.
///
/// [`StreamClient`]: crate::StreamClient
///
/// # Example
///
/// ```
/// use speechlink_stream::StreamConfig;
/// use speechlink_core::ContextMode;
///
/// let config = StreamConfig::new()
///     .with_api_key("xi-key")
///     .with_mode(ContextMode::Multi)
///     .with_inactivity_timeout(60);
/// assert_eq!(config.mode().capacity(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    pub(crate) mode: ContextMode,
    pub(crate) inactivity_timeout: u32,
    pub(crate) sync_alignment: bool,
    pub(crate) fail_on_sink_error: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            mode: ContextMode::Single,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            sync_alignment: true,
            fail_on_sink_error: false,
        }
    }
}

impl StreamConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the WebSocket base URL (default `wss://api.elevenlabs.io/v1`).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
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

    /// Single (capacity 1) or multi-context (capacity 5) operation.
    #[must_use]
    pub const fn with_mode(mut self, mode: ContextMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_inactivity_timeout(mut self, seconds: u32) -> Self {
        self.inactivity_timeout = seconds;
        self
    }

    #[must_use]
    pub const fn with_sync_alignment(mut self, enabled: bool) -> Self {
        self.sync_alignment = enabled;
        self
    }

    /// Treat audio sink failures as fatal instead of dropping the chunk.
    #[must_use]
    pub const fn with_fail_on_sink_error(mut self, enabled: bool) -> Self {
        self.fail_on_sink_error = enabled;
        self
    }

    pub const fn mode(&self) -> ContextMode {
        self.mode
    }
}
