//! Port definitions for external systems.
//!
//! Ports describe what the streaming driver expects from the outside world
//! using only core-owned types. Implementations live in adapter crates.

pub mod catalog;

pub use catalog::{
    AccountInfo, CatalogError, CatalogResult, SharedVoicePage, SharedVoiceQuery,
    SharedVoiceSummary, SubscriptionInfo, UserCapacity, VoiceCatalogPort, VoiceDetails,
};
