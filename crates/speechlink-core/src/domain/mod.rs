//! Domain types for the synthesis stream.
//!
//! These are the shapes that cross the duplex connection, plus the records
//! the streaming driver hands back to callers. They own their serde wire
//! representation so that every adapter parses and emits frames the same way.

mod alignment;
mod context;
mod frames;
mod settings;

pub use alignment::{AlignmentResult, AlignmentSegment};
pub use context::ContextId;
pub use frames::{FrameError, FrameKind, InboundFrame, OutboundFrame};
pub use settings::{GenerationConfig, VoiceSettings};
