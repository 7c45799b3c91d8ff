use agentguard_core::AppResult;
use agentguard_domain::{Agent, ApiEndpoint, FieldMask, LegacyAgent};
use async_trait::async_trait;

/// Port for agent operations on the structured (CX) API.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Fetches one agent by resource name.
    async fn get_agent(&self, endpoint: &ApiEndpoint, name: &str) -> AppResult<Agent>;

    /// Lists every agent under `parent`, following all result pages.
    async fn list_agents(&self, endpoint: &ApiEndpoint, parent: &str) -> AppResult<Vec<Agent>>;

    /// Submits a partial update restricted to `update_mask`.
    async fn update_agent(
        &self,
        endpoint: &ApiEndpoint,
        agent: Agent,
        update_mask: &FieldMask,
    ) -> AppResult<Agent>;
}

/// Port for agent operations on the legacy flat (ES) API.
#[async_trait]
pub trait LegacyAgentApi: Send + Sync {
    /// Creates or updates the project agent restricted to `update_mask`.
    async fn set_agent(
        &self,
        endpoint: &ApiEndpoint,
        agent: LegacyAgent,
        update_mask: &FieldMask,
    ) -> AppResult<LegacyAgent>;
}
