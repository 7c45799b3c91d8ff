use agentguard_application::AccessTokenProvider;
use agentguard_core::{AppError, AppResult};
use async_trait::async_trait;

/// Token provider returning a fixed, externally issued access token.
#[derive(Clone)]
pub struct StaticAccessTokenProvider {
    access_token: String,
}

impl StaticAccessTokenProvider {
    /// Creates a provider for `access_token`.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticAccessTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        if self.access_token.trim().is_empty() {
            return Err(AppError::Validation(
                "static access token must not be empty".to_owned(),
            ));
        }

        Ok(self.access_token.clone())
    }
}
