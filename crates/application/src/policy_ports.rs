mod access_token;
mod agents;
mod fulfillments;
mod webhooks;

use std::sync::Arc;

pub use access_token::AccessTokenProvider;
pub use agents::{AgentApi, LegacyAgentApi};
pub use fulfillments::FulfillmentApi;
pub use webhooks::WebhookApi;

/// Management API adapters used by the policy enforcement service.
#[derive(Clone)]
pub struct ManagementApiPorts {
    /// Agent read/update operations.
    pub agents: Arc<dyn AgentApi>,
    /// Legacy agent logging operations.
    pub legacy_agents: Arc<dyn LegacyAgentApi>,
    /// Webhook read/update operations.
    pub webhooks: Arc<dyn WebhookApi>,
    /// Fulfillment update operations.
    pub fulfillments: Arc<dyn FulfillmentApi>,
}

impl ManagementApiPorts {
    /// Uses one adapter for every management API port.
    #[must_use]
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: AgentApi + LegacyAgentApi + WebhookApi + FulfillmentApi + 'static,
    {
        Self {
            agents: client.clone(),
            legacy_agents: client.clone(),
            webhooks: client.clone(),
            fulfillments: client,
        }
    }
}
