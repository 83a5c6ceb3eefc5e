//! HTTP backend abstraction for the catalog API.
//!
//! The client is generic over [`HttpBackend`] so request logic can be
//! exercised against canned responses.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::models::ApiConfig;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "xi-api-key";

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Fetches JSON documents.
///
/// Implementation detail; external code goes through `VoiceCatalogPort`.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET `url` and deserialize the body.
    ///
    /// Non-success statuses fail with `ApiError::ApiRequestFailed`.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ApiResult<T>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production backend. No retries: callers decide whether to try again.
pub struct ReqwestBackend {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl ReqwestBackend {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }

    fn build_request(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        request
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ApiResult<T> {
        let response = self.build_request(url).send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Catalog request finished");

        if !status.is_success() {
            return Err(ApiError::ApiRequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
