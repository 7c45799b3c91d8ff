use super::*;

impl PolicyEnforcementService {
    /// Runs the remediation selected by `operation_id` against `endpoint`.
    ///
    /// Operations matching no marker are logged and reported as unhandled
    /// without calling the management API.
    pub async fn dispatch(
        &self,
        operation_id: &str,
        event: &AuditEvent,
        endpoint: &ApiEndpoint,
    ) -> AppResult<RemediationOutcome> {
        let Some(kind) = OperationKind::classify(operation_id) else {
            info!(operation_id, "nothing changed for unrecognized operation");
            return Ok(RemediationOutcome::Unhandled {
                operation_id: operation_id.to_owned(),
            });
        };

        let policy = self.logging_policy;
        let result = match kind {
            OperationKind::WebhookUpdated => RemediationResult::Webhook(
                self.delete_webhook_credentials(event.require_resource_name()?, endpoint)
                    .await?,
            ),
            OperationKind::WebhookCreated => RemediationResult::Webhooks(
                self.enforce_webhook_credentials_for_agent(event.require_resource_name()?, endpoint)
                    .await?,
            ),
            OperationKind::LegacyAgentSettingsUpdated => RemediationResult::LegacyAgent(
                self.enforce_legacy_agent_logging(event.require_resource_name()?, policy, endpoint)
                    .await?,
            ),
            OperationKind::AgentUpdated => RemediationResult::Agent(
                self.enforce_agent_logging(event.require_resource_name()?, policy, endpoint)
                    .await?,
            ),
            OperationKind::AgentCreated => RemediationResult::Agents(
                self.enforce_logging_for_all_agents(
                    event.require_request_parent()?,
                    policy,
                    endpoint,
                )
                .await?,
            ),
            OperationKind::FulfillmentUpdated => RemediationResult::Fulfillment(
                self.delete_fulfillment_credentials(event.require_resource_name()?, endpoint)
                    .await?,
            ),
        };

        info!(
            operation_id,
            kind = kind.as_str(),
            modified = result.modified_resource_names().len(),
            "remediation applied"
        );
        Ok(RemediationOutcome::Handled { kind, result })
    }
}
