use std::sync::Arc;

use agentguard_core::{AppError, AppResult, RemoteError, RemoteErrorCode};
use agentguard_domain::{
    Agent, ApiEndpoint, AuditEvent, EndpointResolver, FieldMask, Fulfillment, LegacyAgent,
    LoggingPolicy, OperationKind, RemediationOutcome, RemediationResult, Webhook,
};
use tracing::{info, warn};

use crate::event_decoder::{EventEnvelope, decode_event};
use crate::policy_ports::{
    AgentApi, FulfillmentApi, LegacyAgentApi, ManagementApiPorts, WebhookApi,
};

mod agents;
mod dispatch;
mod fulfillments;
mod webhooks;


/// Enforces agent logging and credential policies in reaction to audit
/// events.
///
/// The service holds no per-event state: each event resolves its own
/// endpoint, so events for agents in different regions can be handled by
/// the same instance concurrently.
#[derive(Clone)]
pub struct PolicyEnforcementService {
    agent_api: Arc<dyn AgentApi>,
    legacy_agent_api: Arc<dyn LegacyAgentApi>,
    webhook_api: Arc<dyn WebhookApi>,
    fulfillment_api: Arc<dyn FulfillmentApi>,
    endpoint_resolver: EndpointResolver,
    logging_policy: LoggingPolicy,
}

impl PolicyEnforcementService {
    /// Creates a policy enforcement service.
    #[must_use]
    pub fn new(
        ports: ManagementApiPorts,
        endpoint_resolver: EndpointResolver,
        logging_policy: LoggingPolicy,
    ) -> Self {
        Self {
            agent_api: ports.agents,
            legacy_agent_api: ports.legacy_agents,
            webhook_api: ports.webhooks,
            fulfillment_api: ports.fulfillments,
            endpoint_resolver,
            logging_policy,
        }
    }

    /// Returns the enforced logging policy.
    #[must_use]
    pub fn logging_policy(&self) -> LoggingPolicy {
        self.logging_policy
    }

    /// Decodes an event envelope and remediates the audited resource.
    ///
    /// Decode failures are returned before any remote call is made.
    pub async fn handle_envelope(&self, envelope: &EventEnvelope) -> AppResult<RemediationOutcome> {
        let event = decode_event(envelope)?;
        self.handle_event(&event).await
    }

    /// Resolves the regional endpoint for an audit event and remediates the
    /// audited resource.
    ///
    /// A region that is not a plain location id is rejected before any
    /// remote call, since it would redirect the bearer token to another host.
    pub async fn handle_event(&self, event: &AuditEvent) -> AppResult<RemediationOutcome> {
        let endpoint = self.endpoint_resolver.resolve(event.region())?;
        info!(
            operation_id = %event.operation_id(),
            region = event.region().unwrap_or("global"),
            endpoint = %endpoint,
            "handling audit event"
        );

        self.dispatch(event.operation_id(), event, &endpoint).await
    }
}

/// Gathers per-resource outcomes of a fan-out action. Every unit has already
/// run; failures are reported together so none is dropped.
fn collect_fan_out<T>(
    operation: &str,
    parent: &str,
    outcomes: Vec<(String, AppResult<T>)>,
) -> AppResult<Vec<T>> {
    let total = outcomes.len();
    let mut succeeded = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut first_code = None;

    for (resource_name, outcome) in outcomes {
        match outcome {
            Ok(value) => succeeded.push(value),
            Err(error) => {
                warn!(
                    operation,
                    resource_name = %resource_name,
                    error = %error,
                    "remediation of one resource failed"
                );
                let code = match &error {
                    AppError::Remediation(remote) => remote.code(),
                    _ => RemoteErrorCode::Other,
                };
                first_code.get_or_insert(code);
                failures.push(format!("{resource_name}: {error}"));
            }
        }
    }

    if failures.is_empty() {
        return Ok(succeeded);
    }

    Err(AppError::Remediation(RemoteError::new(
        operation,
        first_code.unwrap_or(RemoteErrorCode::Other),
        format!(
            "{} of {total} resources under '{parent}' failed: {}",
            failures.len(),
            failures.join("; ")
        ),
    )))
}
