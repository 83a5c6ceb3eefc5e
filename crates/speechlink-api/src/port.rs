//! `VoiceCatalogPort` implementation for `ApiClient`.
//!
//! Converts wire types to core DTOs and internal errors to `CatalogError`.

use async_trait::async_trait;
use speechlink_core::{
    AccountInfo, CatalogError, CatalogResult, SharedVoicePage, SharedVoiceQuery,
    SharedVoiceSummary, SubscriptionInfo, VoiceCatalogPort, VoiceDetails,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpBackend;
use crate::models::{SharedVoiceResponse, SubscriptionResponse, UserResponse, VoiceResponse};

// ============================================================================
// Error Mapping
// ============================================================================

fn map_error(err: ApiError) -> CatalogError {
    match err {
        ApiError::ApiRequestFailed { status, url } => match status {
            401 | 403 => CatalogError::AuthRequired,
            429 => CatalogError::RateLimited,
            _ => CatalogError::Network {
                message: format!("API request failed with status {status}: {url}"),
            },
        },
        ApiError::VoiceNotFound { voice_id } => CatalogError::VoiceNotFound { voice_id },
        ApiError::InvalidResponse { message } => CatalogError::InvalidResponse { message },
        ApiError::Network(e) => CatalogError::Network {
            message: e.to_string(),
        },
        ApiError::InvalidUrl(e) => CatalogError::Configuration {
            message: e.to_string(),
        },
        ApiError::JsonParse(e) => CatalogError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Type Conversions
// ============================================================================

fn to_subscription(sub: SubscriptionResponse) -> SubscriptionInfo {
    SubscriptionInfo {
        tier: sub.tier,
        character_count: sub.character_count,
        character_limit: sub.character_limit,
        can_extend_character_limit: sub.can_extend_character_limit,
        allowed_to_extend_character_limit: sub.allowed_to_extend_character_limit,
        voice_limit: sub.voice_limit,
        professional_voice_limit: sub.professional_voice_limit,
        status: sub.status,
        next_character_count_reset_unix: sub.next_character_count_reset_unix,
    }
}

fn to_account(user: UserResponse) -> AccountInfo {
    AccountInfo {
        user_id: user.user_id,
        subscription: to_subscription(user.subscription),
    }
}

fn to_voice_details(voice: VoiceResponse) -> VoiceDetails {
    VoiceDetails {
        voice_id: voice.voice_id,
        name: voice.name,
        category: voice.category,
        description: voice.description,
        // Null labels carry no information
        labels: voice
            .labels
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect(),
        preview_url: voice.preview_url,
        supported_model_ids: voice.high_quality_base_model_ids,
    }
}

fn to_shared_summary(voice: SharedVoiceResponse) -> SharedVoiceSummary {
    SharedVoiceSummary {
        voice_id: voice.voice_id,
        name: voice.name,
        public_owner_id: voice.public_owner_id,
        category: voice.category,
        gender: voice.gender,
        age: voice.age,
        accent: voice.accent,
        language: voice.language,
        description: voice.description,
        preview_url: voice.preview_url,
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> VoiceCatalogPort for ApiClient<B> {
    async fn user(&self) -> CatalogResult<AccountInfo> {
        self.fetch_user().await.map(to_account).map_err(map_error)
    }

    async fn voice(&self, voice_id: &str) -> CatalogResult<VoiceDetails> {
        self.fetch_voice(voice_id)
            .await
            .map(to_voice_details)
            .map_err(map_error)
    }

    async fn search_shared_voices(
        &self,
        query: &SharedVoiceQuery,
    ) -> CatalogResult<SharedVoicePage> {
        let page = self.fetch_shared_voices(query).await.map_err(map_error)?;
        Ok(SharedVoicePage {
            voices: page.voices.into_iter().map(to_shared_summary).collect(),
            has_more: page.has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_config;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    fn client(backend: FakeBackend) -> ApiClient<FakeBackend> {
        ApiClient::with_backend(test_config(), backend)
    }

    fn voice_json(models: &[&str]) -> serde_json::Value {
        json!({
            "voice_id": "v1",
            "name": "Rachel",
            "category": "premade",
            "labels": {"accent": "american", "use_case": null},
            "preview_url": "https://cdn.test/v1.mp3",
            "high_quality_base_model_ids": models
        })
    }

    #[test]
    fn test_map_error_statuses() {
        let failed = |status| ApiError::ApiRequestFailed {
            status,
            url: "https://api.test/v1/user".to_string(),
        };
        assert_eq!(map_error(failed(401)), CatalogError::AuthRequired);
        assert_eq!(map_error(failed(403)), CatalogError::AuthRequired);
        assert_eq!(map_error(failed(429)), CatalogError::RateLimited);
        assert!(matches!(
            map_error(failed(502)),
            CatalogError::Network { message } if message.contains("502")
        ));
    }

    #[tokio::test]
    async fn test_user_capacity_over_limit() {
        let backend = FakeBackend::new().with_response(
            "/user",
            CannedResponse::ok(json!({
                "user_id": "u1",
                "subscription": {
                    "tier": "starter",
                    "character_count": 30001,
                    "character_limit": 30000,
                    "can_extend_character_limit": false,
                    "status": "active",
                    "next_character_count_reset_unix": 1_760_000_000
                }
            })),
        );

        let capacity = client(backend).user_capacity().await.unwrap();
        assert_eq!(capacity.user_id, "u1");
        assert!(!capacity.has_capacity);
        assert_eq!(
            capacity.subscription.next_character_count_reset_unix,
            Some(1_760_000_000)
        );
    }

    #[tokio::test]
    async fn test_voice_conversion_drops_null_labels() {
        let backend = FakeBackend::new()
            .with_response("/voices/v1", CannedResponse::ok(voice_json(&["m1"])));

        let voice = client(backend).voice("v1").await.unwrap();
        assert_eq!(voice.name, "Rachel");
        assert_eq!(voice.labels.len(), 1);
        assert_eq!(voice.supported_model_ids, vec!["m1".to_string()]);
    }

    #[tokio::test]
    async fn test_validate_voice_model_end_to_end() {
        let backend = FakeBackend::new()
            .with_response("/voices/v1", CannedResponse::ok(voice_json(&["eleven_turbo_v2"])))
            .with_response("/voices/down", CannedResponse::status(500));
        let client = client(backend);

        assert!(client.validate_voice_model("v1", "eleven_turbo_v2").await.is_ok());
        assert!(matches!(
            client.validate_voice_model("v1", "eleven_v3").await,
            Err(CatalogError::ModelNotSupported { .. })
        ));
        assert!(matches!(
            client.validate_voice_model("nope", "eleven_turbo_v2").await,
            Err(CatalogError::VoiceNotFound { voice_id }) if voice_id == "nope"
        ));
        assert!(matches!(
            client.validate_voice_model("down", "eleven_turbo_v2").await,
            Err(CatalogError::VoiceLookupFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_search_shared_voices() {
        let backend = FakeBackend::new().with_response(
            "/shared-voices",
            CannedResponse::ok(json!({
                "voices": [
                    {"voice_id": "s1", "name": "One", "gender": "female"},
                    {"voice_id": "s2", "name": "Two", "accent": "british"}
                ],
                "has_more": false
            })),
        );

        let page = client(backend)
            .search_shared_voices(&SharedVoiceQuery::new().with_gender("female"))
            .await
            .unwrap();
        assert_eq!(page.voices.len(), 2);
        assert_eq!(page.voices[1].accent.as_deref(), Some("british"));
        assert!(!page.has_more);
    }
}
