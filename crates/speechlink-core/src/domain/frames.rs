//! Protocol frames exchanged over the duplex connection.
//!
//! One JSON object per text frame in each direction.
//!
//! ```text
//! outbound: {"text": "Hello ", "context_id": "c1"}
//!           {"text": "", "context_id": "c1", "flush": true}
//!           {"context_id": "c1", "close_context": true}
//!           {"close_socket": true}
//! inbound:  {"audio": "<base64>", "isFinal": false,
//!            "normalizedAlignment": {...}, "alignment": {...}, "contextId": "c1"}
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::alignment::{AlignmentResult, AlignmentSegment};
use super::context::ContextId;
use super::settings::{GenerationConfig, VoiceSettings};

/// Text payload of the handshake frame: a single space opens the synthesis
/// pipeline without producing audible output.
pub const HANDSHAKE_TEXT: &str = " ";

/// Errors raised while encoding or decoding frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame is not valid JSON or has the wrong shape.
    #[error("Malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    /// The audio payload is not valid base64.
    #[error("Undecodable audio payload: {0}")]
    Audio(#[from] base64::DecodeError),

    /// An alignment segment violates its invariants.
    #[error("Invalid {field}: {message}")]
    Alignment {
        /// Which segment (`alignment` or `normalizedAlignment`)
        field: &'static str,
        /// Description of the violation
        message: String,
    },

    /// Audio is absent on a frame that carries alignment data.
    #[error("Frame carries alignment but no audio payload")]
    MissingAudio,
}

// ============================================================================
// Outbound
// ============================================================================

/// The kind of an outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Handshake establishing a context.
    Init,
    /// A text fragment to synthesize.
    Text,
    /// Empty-text end-of-utterance marker.
    Flush,
    /// Closes one context.
    CloseContext,
    /// Asks the service to finish all contexts and close the connection.
    CloseSocket,
}

/// A frame sent to the synthesis service.
///
/// Addresses at most one context.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundFrame {
    pub kind: FrameKind,
    pub context_id: Option<ContextId>,
    pub text: Option<String>,
    pub voice_settings: Option<VoiceSettings>,
    pub generation_config: Option<GenerationConfig>,
}

impl OutboundFrame {
    const fn bare(kind: FrameKind, context_id: Option<ContextId>, text: Option<String>) -> Self {
        Self {
            kind,
            context_id,
            text,
            voice_settings: None,
            generation_config: None,
        }
    }

    /// Handshake frame opening `context_id`.
    pub fn init(context_id: ContextId) -> Self {
        Self::bare(
            FrameKind::Init,
            Some(context_id),
            Some(HANDSHAKE_TEXT.to_string()),
        )
    }

    /// Text fragment for `context_id`.
    pub fn text(context_id: ContextId, text: impl Into<String>) -> Self {
        Self::bare(FrameKind::Text, Some(context_id), Some(text.into()))
    }

    /// End-of-utterance marker for `context_id`.
    pub fn flush(context_id: ContextId) -> Self {
        Self::bare(FrameKind::Flush, Some(context_id), Some(String::new()))
    }

    /// Close `context_id`.
    pub const fn close_context(context_id: ContextId) -> Self {
        Self::bare(FrameKind::CloseContext, Some(context_id), None)
    }

    /// Close the whole connection once pending work is done.
    pub const fn close_socket() -> Self {
        Self::bare(FrameKind::CloseSocket, None, None)
    }

    #[must_use]
    pub const fn with_voice_settings(mut self, settings: Option<VoiceSettings>) -> Self {
        self.voice_settings = settings;
        self
    }

    #[must_use]
    pub fn with_generation_config(mut self, config: Option<GenerationConfig>) -> Self {
        self.generation_config = config;
        self
    }

    /// Serialize to the JSON wire form.
    pub fn encode(&self) -> Result<String, FrameError> {
        let wire = OutboundWire {
            text: self.text.as_deref(),
            context_id: self.context_id.as_ref().map(ContextId::as_str),
            flush: self.kind == FrameKind::Flush,
            close_context: self.kind == FrameKind::CloseContext,
            close_socket: self.kind == FrameKind::CloseSocket,
            voice_settings: self.voice_settings.as_ref(),
            generation_config: self.generation_config.as_ref(),
        };
        Ok(serde_json::to_string(&wire)?)
    }
}

// serde's skip_serializing_if hands the field by reference
#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Serialize)]
struct OutboundWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_id: Option<&'a str>,
    #[serde(skip_serializing_if = "is_false")]
    flush: bool,
    #[serde(skip_serializing_if = "is_false")]
    close_context: bool,
    #[serde(skip_serializing_if = "is_false")]
    close_socket: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_settings: Option<&'a VoiceSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<&'a GenerationConfig>,
}

// ============================================================================
// Inbound
// ============================================================================

/// Raw inbound shape. Alignment fields are frequently `null` on the wire,
/// and the context id arrives under either of two names.
#[derive(Deserialize)]
struct InboundWire {
    #[serde(default)]
    audio: Option<String>,
    #[serde(default, rename = "isFinal")]
    is_final: Option<bool>,
    #[serde(default, rename = "normalizedAlignment")]
    normalized_alignment: Option<AlignmentSegment>,
    #[serde(default)]
    alignment: Option<AlignmentSegment>,
    #[serde(default, rename = "contextId")]
    context_id_camel: Option<String>,
    #[serde(default, rename = "context_id")]
    context_id_snake: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A frame received from the synthesis service, normalized at the parsing
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// Base64 audio payload, absent on keepalive/final frames.
    pub audio: Option<String>,
    pub is_final: bool,
    pub normalized_alignment: AlignmentSegment,
    pub alignment: AlignmentSegment,
    /// Canonical context id (`contextId` preferred over `context_id`).
    pub context_id: Option<ContextId>,
    /// Error reported by the service, if this is an error frame.
    pub remote_error: Option<String>,
}

impl InboundFrame {
    /// Parse and validate one inbound JSON frame.
    pub fn parse(raw: &str) -> Result<Self, FrameError> {
        let wire: InboundWire = serde_json::from_str(raw)?;

        let normalized_alignment = wire.normalized_alignment.unwrap_or_default();
        let alignment = wire.alignment.unwrap_or_default();
        normalized_alignment
            .validate()
            .map_err(|message| FrameError::Alignment {
                field: "normalizedAlignment",
                message,
            })?;
        alignment
            .validate()
            .map_err(|message| FrameError::Alignment {
                field: "alignment",
                message,
            })?;

        let is_final = wire.is_final.unwrap_or(false);
        let audio = wire.audio.filter(|a| !a.is_empty());
        let remote_error = match (wire.error, wire.message) {
            (Some(error), Some(message)) => Some(format!("{error}: {message}")),
            (Some(error), None) => Some(error),
            (None, _) => None,
        };

        if audio.is_none()
            && !is_final
            && remote_error.is_none()
            && !(normalized_alignment.is_empty() && alignment.is_empty())
        {
            return Err(FrameError::MissingAudio);
        }

        let context_id = wire
            .context_id_camel
            .filter(|id| !id.is_empty())
            .or_else(|| wire.context_id_snake.filter(|id| !id.is_empty()))
            .map(ContextId::from);

        Ok(Self {
            audio,
            is_final,
            normalized_alignment,
            alignment,
            context_id,
            remote_error,
        })
    }

    /// Decode the base64 audio payload. Absent audio decodes to no bytes.
    pub fn decode_audio(&self) -> Result<Vec<u8>, FrameError> {
        let decoded = self.audio.as_deref().map(|a| STANDARD.decode(a)).transpose()?;
        Ok(decoded.unwrap_or_default())
    }

    /// Split off the non-audio part for the results queue.
    pub fn into_result(self) -> AlignmentResult {
        AlignmentResult {
            context_id: self.context_id,
            is_final: self.is_final,
            normalized_alignment: self.normalized_alignment,
            alignment: self.alignment,
        }
    }
}
