//! Voice catalog port trait.

use async_trait::async_trait;
use tracing::debug;

use super::error::{CatalogError, CatalogResult};
use super::types::{AccountInfo, SharedVoicePage, SharedVoiceQuery, UserCapacity, VoiceDetails};

/// Port trait for the synthesis service's REST catalog.
///
/// # Design
///
/// - Uses core-owned DTOs, not wire types
/// - Returns `CatalogError` for all failures
/// - Derived checks (`user_capacity`, `validate_voice_model`) are provided
///   methods built on the three required lookups
#[async_trait]
pub trait VoiceCatalogPort: Send + Sync {
    /// Fetch the account behind the configured key.
    async fn user(&self) -> CatalogResult<AccountInfo>;

    /// Look up one voice.
    ///
    /// Fails with `CatalogError::VoiceNotFound` when the voice does not exist.
    async fn voice(&self, voice_id: &str) -> CatalogResult<VoiceDetails>;

    /// Search the shared voice library.
    async fn search_shared_voices(&self, query: &SharedVoiceQuery)
    -> CatalogResult<SharedVoicePage>;

    /// Account information plus whether it can still synthesize.
    async fn user_capacity(&self) -> CatalogResult<UserCapacity> {
        self.user().await.map(UserCapacity::from)
    }

    /// Check that `voice_id` exists and supports `model_id`.
    async fn validate_voice_model(&self, voice_id: &str, model_id: &str) -> CatalogResult<()> {
        if voice_id.is_empty() {
            return Err(CatalogError::VoiceNotFound {
                voice_id: String::new(),
            });
        }

        let voice = match self.voice(voice_id).await {
            Ok(voice) => voice,
            Err(err @ CatalogError::VoiceNotFound { .. }) => return Err(err),
            Err(err) => {
                return Err(CatalogError::VoiceLookupFailed {
                    message: err.to_string(),
                });
            }
        };

        if voice.voice_id.is_empty() {
            return Err(CatalogError::VoiceNotFound {
                voice_id: voice_id.to_string(),
            });
        }
        if !voice.supports_model(model_id) {
            return Err(CatalogError::ModelNotSupported {
                voice_id: voice_id.to_string(),
                model_id: model_id.to_string(),
            });
        }

        debug!(voice_id, model_id, "Voice supports model");
        Ok(())
    }
}
