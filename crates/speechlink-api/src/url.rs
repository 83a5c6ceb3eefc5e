//! URL construction helpers for the catalog API.

use speechlink_core::SharedVoiceQuery;
use url::Url;

use crate::models::ApiConfig;

/// Append path segments to the base URL, percent-encoding each one.
fn with_segments(config: &ApiConfig, segments: &[&str]) -> Url {
    let mut url = config.base_url.clone();
    // Base-capable URLs are guaranteed by ApiConfig construction
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub fn build_user_url(config: &ApiConfig) -> Url {
    with_segments(config, &["user"])
}

pub fn build_voice_url(config: &ApiConfig, voice_id: &str) -> Url {
    with_segments(config, &["voices", voice_id])
}

/// Shared-voice search URL with every set filter as a query parameter.
pub fn build_shared_voices_url(config: &ApiConfig, query: &SharedVoiceQuery) -> Url {
    let mut url = with_segments(config, &["shared-voices"]);
    let pairs = query.pairs();
    if !pairs.is_empty() {
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
    }
    url
}
