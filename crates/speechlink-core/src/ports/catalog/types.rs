//! Core-owned DTOs for voice catalog operations.
//!
//! These cross the boundary between `speechlink-api` and its consumers and
//! carry only the fields the driver and callers act on.

use serde::{Deserialize, Serialize};

/// Subscription quota for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    /// Plan tier (e.g. "free", "creator")
    pub tier: String,
    /// Characters used in the current period
    pub character_count: u64,
    /// Characters allowed in the current period
    pub character_limit: u64,
    pub can_extend_character_limit: bool,
    pub allowed_to_extend_character_limit: bool,
    pub voice_limit: u32,
    pub professional_voice_limit: u32,
    /// Subscription status (e.g. "active")
    pub status: String,
    /// Unix timestamp of the next character-count reset
    pub next_character_count_reset_unix: Option<i64>,
}

impl SubscriptionInfo {
    /// Whether the account may still synthesize.
    pub const fn has_capacity(&self) -> bool {
        self.character_count <= self.character_limit || self.can_extend_character_limit
    }
}

/// Account information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub user_id: String,
    pub subscription: SubscriptionInfo,
}

/// Account information with the derived capacity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCapacity {
    pub user_id: String,
    pub subscription: SubscriptionInfo,
    pub has_capacity: bool,
}

impl From<AccountInfo> for UserCapacity {
    fn from(account: AccountInfo) -> Self {
        let has_capacity = account.subscription.has_capacity();
        Self {
            user_id: account.user_id,
            subscription: account.subscription,
            has_capacity,
        }
    }
}

/// A voice as returned by a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDetails {
    pub voice_id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Free-form labels (accent, age, gender, ...)
    #[serde(default)]
    pub labels: std::collections::BTreeMap<String, String>,
    pub preview_url: Option<String>,
    /// Models able to synthesize with this voice
    #[serde(default)]
    pub supported_model_ids: Vec<String>,
}

impl VoiceDetails {
    pub fn supports_model(&self, model_id: &str) -> bool {
        self.supported_model_ids.iter().any(|m| m == model_id)
    }
}

/// Filters for shared-voice search. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedVoiceQuery {
    pub category: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub accent: Option<String>,
    pub language: Option<String>,
    pub locale: Option<String>,
    /// Free-text search
    pub search: Option<String>,
    pub page_size: Option<u32>,
    pub page: Option<u32>,
}

impl SharedVoiceQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Set filters as `(name, value)` pairs, in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("category", &self.category),
            ("gender", &self.gender),
            ("age", &self.age),
            ("accent", &self.accent),
            ("language", &self.language),
            ("locale", &self.locale),
            ("search", &self.search),
        ];
        let mut pairs: Vec<_> = text
            .into_iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k, v.clone())))
            .collect();
        if let Some(size) = self.page_size {
            pairs.push(("page_size", size.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

/// One shared (community) voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedVoiceSummary {
    pub voice_id: String,
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

/// One page of shared-voice search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedVoicePage {
    pub voices: Vec<SharedVoiceSummary>,
    pub has_more: bool,
}
