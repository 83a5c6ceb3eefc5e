//! Voice-tuning and generation-pacing settings carried on outbound frames.

use serde::{Deserialize, Serialize};

/// Voice tuning applied by the synthesis service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Voice stability (0.0–1.0).
    pub stability: f32,
    /// Similarity boost (0.0–1.0).
    pub similarity_boost: f32,
    /// Style exaggeration (0.0–1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<f32>,
    /// Speaker boost flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_speaker_boost: Option<bool>,
}

impl VoiceSettings {
    /// Settings with the given stability and similarity boost.
    #[must_use]
    pub const fn new(stability: f32, similarity_boost: f32) -> Self {
        Self {
            stability,
            similarity_boost,
            style: None,
            use_speaker_boost: None,
        }
    }

    #[must_use]
    pub const fn with_style(mut self, style: f32) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub const fn with_speaker_boost(mut self, enabled: bool) -> Self {
        self.use_speaker_boost = Some(enabled);
        self
    }
}

/// Generation pacing: how many buffered characters trigger each audio chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Ordered chunk-length schedule.
    pub chunk_length_schedule: Vec<u32>,
}

impl GenerationConfig {
    pub fn new(schedule: impl Into<Vec<u32>>) -> Self {
        Self {
            chunk_length_schedule: schedule.into(),
        }
    }
}
