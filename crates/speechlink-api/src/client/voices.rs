//! Voice lookup and shared-voice search.

use speechlink_core::SharedVoiceQuery;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::http::HttpBackend;
use crate::models::{SharedVoicesResponse, VoiceResponse};
use crate::url::{build_shared_voices_url, build_voice_url};

impl<B: HttpBackend> ApiClient<B> {
    /// Look up one voice. A 404 becomes `ApiError::VoiceNotFound`.
    pub(crate) async fn fetch_voice(&self, voice_id: &str) -> ApiResult<VoiceResponse> {
        let url = build_voice_url(&self.config, voice_id);
        match self.backend.get_json(&url).await {
            Err(ApiError::ApiRequestFailed { status: 404, .. }) => Err(ApiError::VoiceNotFound {
                voice_id: voice_id.to_string(),
            }),
            other => other,
        }
    }

    /// Fetch one page of shared voices.
    pub(crate) async fn fetch_shared_voices(
        &self,
        query: &SharedVoiceQuery,
    ) -> ApiResult<SharedVoicesResponse> {
        let url = build_shared_voices_url(&self.config, query);
        let page: SharedVoicesResponse = self.backend.get_json(&url).await?;
        debug!(count = page.voices.len(), has_more = page.has_more, "Shared voices fetched");
        Ok(page)
    }
}
