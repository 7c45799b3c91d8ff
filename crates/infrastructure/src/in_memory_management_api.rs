use std::collections::BTreeMap;

use agentguard_application::{AgentApi, FulfillmentApi, LegacyAgentApi, WebhookApi};
use agentguard_core::{AppResult, RemoteError, RemoteErrorCode};
use agentguard_domain::{
    Agent, ApiEndpoint, FieldMask, Fulfillment, GenericWebService, LegacyAgent, Webhook,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory management API backing receiver tests.
///
/// Resources are keyed by name regardless of the endpoint they are requested
/// from. Updates honor the update mask like the remote API does.
#[derive(Debug, Default)]
pub struct InMemoryManagementApi {
    agents: RwLock<BTreeMap<String, Agent>>,
    legacy_agents: RwLock<BTreeMap<String, LegacyAgent>>,
    webhooks: RwLock<BTreeMap<String, Webhook>>,
    fulfillments: RwLock<BTreeMap<String, Fulfillment>>,
    update_count: RwLock<usize>,
}

impl InMemoryManagementApi {
    /// Creates an empty in-memory API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces an agent.
    pub async fn seed_agent(&self, agent: Agent) {
        self.agents.write().await.insert(agent.name.clone(), agent);
    }

    /// Stores or replaces a webhook.
    pub async fn seed_webhook(&self, webhook: Webhook) {
        self.webhooks
            .write()
            .await
            .insert(webhook.name.clone(), webhook);
    }

    /// Stores or replaces a fulfillment.
    pub async fn seed_fulfillment(&self, fulfillment: Fulfillment) {
        self.fulfillments
            .write()
            .await
            .insert(fulfillment.name.clone(), fulfillment);
    }

    /// Returns a stored agent.
    pub async fn agent(&self, name: &str) -> Option<Agent> {
        self.agents.read().await.get(name).cloned()
    }

    /// Returns a stored legacy agent by project parent.
    pub async fn legacy_agent(&self, parent: &str) -> Option<LegacyAgent> {
        self.legacy_agents.read().await.get(parent).cloned()
    }

    /// Returns a stored webhook.
    pub async fn webhook(&self, name: &str) -> Option<Webhook> {
        self.webhooks.read().await.get(name).cloned()
    }

    /// Returns a stored fulfillment.
    pub async fn fulfillment(&self, name: &str) -> Option<Fulfillment> {
        self.fulfillments.read().await.get(name).cloned()
    }

    /// Returns how many mutating calls were accepted.
    pub async fn update_count(&self) -> usize {
        *self.update_count.read().await
    }

    async fn record_update(&self) {
        *self.update_count.write().await += 1;
    }
}

fn not_found(operation: &str, name: &str) -> RemoteError {
    RemoteError::new(
        operation,
        RemoteErrorCode::NotFound,
        format!("resource '{name}' does not exist"),
    )
    .with_http_status(404)
}

fn unsupported_mask(operation: &str, path: &str) -> RemoteError {
    RemoteError::new(
        operation,
        RemoteErrorCode::Other,
        format!("update mask path '{path}' is not supported"),
    )
    .with_http_status(400)
}

fn children_of<'a, T: Clone + 'a>(
    resources: impl Iterator<Item = (&'a String, &'a T)>,
    parent: &str,
    collection: &str,
) -> Vec<T> {
    let prefix = format!("{parent}/{collection}/");
    resources
        .filter(|(name, _)| {
            name.strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.contains('/'))
        })
        .map(|(_, resource)| resource.clone())
        .collect()
}

/// Copies the masked credential fields. A missing web service is only
/// created when a non-empty value has to be stored in it.
fn merge_credentials(
    operation: &str,
    target: &mut Option<GenericWebService>,
    source: Option<GenericWebService>,
    update_mask: &FieldMask,
) -> AppResult<()> {
    let source = source.unwrap_or_default();
    for path in update_mask.paths() {
        let value = match path.as_str() {
            "generic_web_service.username" => source.username.as_str(),
            "generic_web_service.password" => source.password.as_str(),
            other => return Err(unsupported_mask(operation, other).into()),
        };
        if target.is_none() && value.is_empty() {
            continue;
        }

        let service = target.get_or_insert_with(GenericWebService::default);
        if path == "generic_web_service.username" {
            service.username = value.to_owned();
        } else {
            service.password = value.to_owned();
        }
    }

    Ok(())
}

#[async_trait]
impl AgentApi for InMemoryManagementApi {
    async fn get_agent(&self, _endpoint: &ApiEndpoint, name: &str) -> AppResult<Agent> {
        self.agent(name)
            .await
            .ok_or_else(|| not_found("get_agent", name).into())
    }

    async fn list_agents(&self, _endpoint: &ApiEndpoint, parent: &str) -> AppResult<Vec<Agent>> {
        Ok(children_of(self.agents.read().await.iter(), parent, "agents"))
    }

    async fn update_agent(
        &self,
        _endpoint: &ApiEndpoint,
        agent: Agent,
        update_mask: &FieldMask,
    ) -> AppResult<Agent> {
        let mut agents = self.agents.write().await;
        let stored = agents
            .get_mut(agent.name.as_str())
            .ok_or_else(|| not_found("update_agent", agent.name.as_str()))?;

        for path in update_mask.paths() {
            match path.as_str() {
                "advanced_settings" => stored.advanced_settings = agent.advanced_settings.clone(),
                "display_name" => stored.display_name = agent.display_name.clone(),
                other => return Err(unsupported_mask("update_agent", other).into()),
            }
        }

        let updated = stored.clone();
        drop(agents);
        self.record_update().await;
        Ok(updated)
    }
}

#[async_trait]
impl LegacyAgentApi for InMemoryManagementApi {
    async fn set_agent(
        &self,
        _endpoint: &ApiEndpoint,
        agent: LegacyAgent,
        update_mask: &FieldMask,
    ) -> AppResult<LegacyAgent> {
        let mut legacy_agents = self.legacy_agents.write().await;
        let stored = legacy_agents
            .entry(agent.parent.clone())
            .or_insert_with(|| LegacyAgent {
                parent: agent.parent.clone(),
                ..LegacyAgent::default()
            });

        for path in update_mask.paths() {
            match path.as_str() {
                "enable_logging" => stored.enable_logging = agent.enable_logging,
                other => return Err(unsupported_mask("set_agent", other).into()),
            }
        }

        let updated = stored.clone();
        drop(legacy_agents);
        self.record_update().await;
        Ok(updated)
    }
}

#[async_trait]
impl WebhookApi for InMemoryManagementApi {
    async fn get_webhook(&self, _endpoint: &ApiEndpoint, name: &str) -> AppResult<Webhook> {
        self.webhook(name)
            .await
            .ok_or_else(|| not_found("get_webhook", name).into())
    }

    async fn list_webhooks(
        &self,
        _endpoint: &ApiEndpoint,
        parent: &str,
    ) -> AppResult<Vec<Webhook>> {
        Ok(children_of(
            self.webhooks.read().await.iter(),
            parent,
            "webhooks",
        ))
    }

    async fn update_webhook(
        &self,
        _endpoint: &ApiEndpoint,
        webhook: Webhook,
        update_mask: &FieldMask,
    ) -> AppResult<Webhook> {
        let mut webhooks = self.webhooks.write().await;
        let stored = webhooks
            .get_mut(webhook.name.as_str())
            .ok_or_else(|| not_found("update_webhook", webhook.name.as_str()))?;

        merge_credentials(
            "update_webhook",
            &mut stored.generic_web_service,
            webhook.generic_web_service,
            update_mask,
        )?;

        let updated = stored.clone();
        drop(webhooks);
        self.record_update().await;
        Ok(updated)
    }
}

#[async_trait]
impl FulfillmentApi for InMemoryManagementApi {
    async fn update_fulfillment(
        &self,
        _endpoint: &ApiEndpoint,
        fulfillment: Fulfillment,
        update_mask: &FieldMask,
    ) -> AppResult<Fulfillment> {
        let mut fulfillments = self.fulfillments.write().await;
        let stored = fulfillments
            .get_mut(fulfillment.name.as_str())
            .ok_or_else(|| not_found("update_fulfillment", fulfillment.name.as_str()))?;

        merge_credentials(
            "update_fulfillment",
            &mut stored.generic_web_service,
            fulfillment.generic_web_service,
            update_mask,
        )?;

        let updated = stored.clone();
        drop(fulfillments);
        self.record_update().await;
        Ok(updated)
    }
}
