//! Account and subscription lookup.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::models::UserResponse;
use crate::url::build_user_url;

impl<B: HttpBackend> ApiClient<B> {
    /// Fetch the account behind the configured API key.
    pub(crate) async fn fetch_user(&self) -> ApiResult<UserResponse> {
        let url = build_user_url(&self.config);
        self.backend.get_json(&url).await
    }
}
