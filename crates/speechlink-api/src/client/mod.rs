//! Catalog client.

mod account;
mod voices;

use url::Url;

use crate::config::ApiClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::ApiConfig;

// ============================================================================
// Type Aliases
// ============================================================================

/// Catalog client using the reqwest HTTP backend.
pub type DefaultApiClient = ApiClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the service's REST catalog, generic over the HTTP backend.
pub struct ApiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: ApiConfig,
}

impl DefaultApiClient {
    /// Create a client from public configuration.
    ///
    /// Fails when the base URL does not parse or cannot carry a path, or
    /// when the HTTP client cannot be built.
    pub fn new(config: &ApiClientConfig) -> ApiResult<Self> {
        let internal_config = to_internal_config(config)?;
        let backend = ReqwestBackend::new(&internal_config)?;
        Ok(Self {
            backend,
            config: internal_config,
        })
    }
}

impl<B: HttpBackend> ApiClient<B> {
    /// Create a client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: ApiConfig, backend: B) -> Self {
        Self { backend, config }
    }
}

fn to_internal_config(config: &ApiClientConfig) -> ApiResult<ApiConfig> {
    let base_url = Url::parse(&config.base_url)?;
    if base_url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(
            url::ParseError::RelativeUrlWithCannotBeABaseBase,
        ));
    }
    Ok(ApiConfig {
        base_url,
        api_key: config.api_key.clone(),
        timeout: config.timeout,
        user_agent: config.user_agent.clone(),
    })
}
