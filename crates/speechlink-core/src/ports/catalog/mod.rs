//! Voice catalog port definitions.
//!
//! Account capacity, voice lookup and shared-voice search. The HTTP
//! implementation lives in `speechlink-api`.

mod client;
mod error;
mod types;

pub use client::VoiceCatalogPort;
pub use error::{CatalogError, CatalogResult};
pub use types::{
    AccountInfo, SharedVoicePage, SharedVoiceQuery, SharedVoiceSummary, SubscriptionInfo,
    UserCapacity, VoiceDetails,
};
