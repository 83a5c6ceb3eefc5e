//! Core domain types, admission control and port definitions for speechlink.
//!
//! This crate has no network I/O and no async runtime. It owns:
//!
//! - the wire-level frame model shared by the streaming driver
//!   ([`OutboundFrame`], [`InboundFrame`], [`AlignmentSegment`]),
//! - the [`AdmissionController`] that bounds how many synthesis contexts
//!   may be open at once,
//! - the [`VoiceCatalogPort`] trait and its DTOs, implemented by
//!   `speechlink-api`.

#![deny(unused_crate_dependencies)]

pub mod admission;
pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use admission::{AdmissionController, AdmissionError, ContextMode};
pub use domain::{
    AlignmentResult, AlignmentSegment, ContextId, FrameError, FrameKind, GenerationConfig,
    InboundFrame, OutboundFrame, VoiceSettings,
};
pub use ports::{
    AccountInfo, CatalogError, CatalogResult, SharedVoicePage, SharedVoiceQuery,
    SharedVoiceSummary, SubscriptionInfo, UserCapacity, VoiceCatalogPort, VoiceDetails,
};
