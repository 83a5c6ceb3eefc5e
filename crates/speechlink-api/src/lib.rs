//! REST catalog client for the synthesis service.
//!
//! Implements [`speechlink_core::VoiceCatalogPort`] over HTTP: account and
//! subscription capacity, single-voice lookup (used to validate that a
//! voice supports a model before a stream is opened) and shared-voice
//! search.
//!
//! ```no_run
//! use speechlink_api::{ApiClientConfig, DefaultApiClient};
//! use speechlink_core::VoiceCatalogPort;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DefaultApiClient::new(&ApiClientConfig::new().with_api_key("xi-key"))?;
//! let capacity = client.user_capacity().await?;
//! println!("can synthesize: {}", capacity.has_capacity);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// ApiClient<B> is used through DefaultApiClient and the port trait
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

pub use client::DefaultApiClient;
pub use config::ApiClientConfig;
pub use error::{ApiError, ApiResult};

// Silence unused dev-dependency warnings
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
