//! Internal API response types.
//!
//! Wire shapes as the service returns them. Consumers see the port DTOs
//! from `speechlink-core` instead.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration, validated from `ApiClientConfig`.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// REST base URL; always a base-capable URL
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

// ============================================================================
// GET /user
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub user_id: String,
    #[serde(default)]
    pub subscription: SubscriptionResponse,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubscriptionResponse {
    pub tier: String,
    pub character_count: u64,
    pub character_limit: u64,
    pub can_extend_character_limit: bool,
    pub allowed_to_extend_character_limit: bool,
    pub voice_limit: u32,
    pub professional_voice_limit: u32,
    pub status: String,
    pub next_character_count_reset_unix: Option<i64>,
}

// ============================================================================
// GET /voices/{voice_id}
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceResponse {
    #[serde(default)]
    pub voice_id: String,
    #[serde(default)]
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Label values may be null on the wire
    #[serde(default)]
    pub labels: BTreeMap<String, Option<String>>,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub high_quality_base_model_ids: Vec<String>,
}

// ============================================================================
// GET /shared-voices
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SharedVoicesResponse {
    #[serde(default)]
    pub voices: Vec<SharedVoiceResponse>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharedVoiceResponse {
    pub voice_id: String,
    #[serde(default)]
    pub name: String,
    pub public_owner_id: Option<String>,
    pub category: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub accent: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
}
