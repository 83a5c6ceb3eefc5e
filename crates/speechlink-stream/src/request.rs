//! Per-session stream request.

use speechlink_core::{GenerationConfig, VoiceSettings};

use crate::query::QueryOption;

/// What to synthesize with: voice, model, tuning and query modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    pub voice_id: String,
    pub model_id: String,
    /// Sent on the handshake frame
    pub voice_settings: Option<VoiceSettings>,
    /// Sent on the handshake frame
    pub generation_config: Option<GenerationConfig>,
    pub query: Vec<QueryOption>,
}

impl StreamRequest {
    pub fn new(voice_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            model_id: model_id.into(),
            voice_settings: None,
            generation_config: None,
            query: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice_settings = Some(settings);
        self
    }

    #[must_use]
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Add a query modifier. Later modifiers win over earlier ones.
    #[must_use]
    pub fn with_query(mut self, option: QueryOption) -> Self {
        self.query.push(option);
        self
    }
}
