use agentguard_core::AppResult;
use agentguard_domain::{ApiEndpoint, FieldMask, Webhook};
use async_trait::async_trait;

/// Port for webhook operations.
#[async_trait]
pub trait WebhookApi: Send + Sync {
    /// Fetches one webhook by resource name.
    async fn get_webhook(&self, endpoint: &ApiEndpoint, name: &str) -> AppResult<Webhook>;

    /// Lists every webhook of the agent `parent`, following all result pages.
    async fn list_webhooks(&self, endpoint: &ApiEndpoint, parent: &str)
    -> AppResult<Vec<Webhook>>;

    /// Submits a partial update restricted to `update_mask`.
    async fn update_webhook(
        &self,
        endpoint: &ApiEndpoint,
        webhook: Webhook,
        update_mask: &FieldMask,
    ) -> AppResult<Webhook>;
}
