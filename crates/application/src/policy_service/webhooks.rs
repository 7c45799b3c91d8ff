use super::*;

impl PolicyEnforcementService {
    /// Clears the static username and password of one webhook.
    ///
    /// Only these two fields are scrubbed; credentials carried in request
    /// headers are left in place.
    pub async fn delete_webhook_credentials(
        &self,
        webhook_name: &str,
        endpoint: &ApiEndpoint,
    ) -> AppResult<Webhook> {
        let mut webhook = self.webhook_api.get_webhook(endpoint, webhook_name).await?;
        webhook.clear_credentials();

        let updated = self
            .webhook_api
            .update_webhook(endpoint, webhook, &FieldMask::web_service_credentials())
            .await?;

        info!(
            resource_name = %updated.name,
            "deleted static credentials on webhook"
        );
        Ok(updated)
    }

    /// Clears static credentials on every webhook of an agent.
    ///
    /// Creation events name the agent (or the new webhook under it), so the
    /// whole agent is swept.
    pub async fn enforce_webhook_credentials_for_agent(
        &self,
        agent_name: &str,
        endpoint: &ApiEndpoint,
    ) -> AppResult<Vec<Webhook>> {
        let agent_name = owning_agent_name(agent_name);
        let webhooks = self.webhook_api.list_webhooks(endpoint, agent_name).await?;

        let mut outcomes = Vec::with_capacity(webhooks.len());
        for webhook in webhooks {
            let outcome = self
                .delete_webhook_credentials(webhook.name.as_str(), endpoint)
                .await;
            outcomes.push((webhook.name, outcome));
        }

        collect_fan_out("enforce_webhook_credentials_for_agent", agent_name, outcomes)
    }
}

fn owning_agent_name(resource_name: &str) -> &str {
    resource_name
        .split_once("/webhooks/")
        .map_or(resource_name, |(agent_name, _)| agent_name)
}
