use agentguard_core::AppResult;
use async_trait::async_trait;

/// Source of OAuth bearer tokens for management API calls.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a currently valid access token.
    async fn access_token(&self) -> AppResult<String>;
}
