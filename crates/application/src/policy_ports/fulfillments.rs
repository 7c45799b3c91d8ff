use agentguard_core::AppResult;
use agentguard_domain::{ApiEndpoint, FieldMask, Fulfillment};
use async_trait::async_trait;

/// Port for fulfillment operations on the legacy (ES) API.
#[async_trait]
pub trait FulfillmentApi: Send + Sync {
    /// Submits a partial update restricted to `update_mask`.
    async fn update_fulfillment(
        &self,
        endpoint: &ApiEndpoint,
        fulfillment: Fulfillment,
        update_mask: &FieldMask,
    ) -> AppResult<Fulfillment>;
}
