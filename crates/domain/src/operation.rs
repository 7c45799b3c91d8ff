use serde::{Deserialize, Serialize};

/// Audit operation classes that trigger a remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A webhook was updated; scrub its credentials.
    WebhookUpdated,
    /// A webhook was created under an agent; scrub all agent webhooks.
    WebhookCreated,
    /// Legacy (ES) agent settings were updated; reset the logging flag.
    LegacyAgentSettingsUpdated,
    /// An agent was updated; reset its logging settings.
    AgentUpdated,
    /// An agent was created under a parent; reset logging on all agents.
    AgentCreated,
    /// A fulfillment was updated; scrub its credentials.
    FulfillmentUpdated,
}

/// Operation markers in match order. The first marker contained in an
/// operation id wins.
///
/// Matching is by substring because operation ids carry version-specific
/// prefixes (`google.cloud.dialogflow.cx.v3.Webhooks.UpdateWebhook`,
/// `google.cloud.dialogflow.v3alpha1.Webhooks.UpdateWebhook`, ...).
/// `Agents.UpdateAgentSettings` must precede `Agents.UpdateAgent`, which it
/// contains.
pub const OPERATION_MARKERS: [(&str, OperationKind); 6] = [
    ("Webhooks.UpdateWebhook", OperationKind::WebhookUpdated),
    ("Webhooks.CreateWebhook", OperationKind::WebhookCreated),
    (
        "Agents.UpdateAgentSettings",
        OperationKind::LegacyAgentSettingsUpdated,
    ),
    ("Agents.UpdateAgent", OperationKind::AgentUpdated),
    ("Agents.CreateAgent", OperationKind::AgentCreated),
    (
        "Fulfillments.UpdateFulfillment",
        OperationKind::FulfillmentUpdated,
    ),
];

impl OperationKind {
    /// Classifies a raw operation id, returning `None` for operations that
    /// need no remediation.
    #[must_use]
    pub fn classify(operation_id: &str) -> Option<Self> {
        OPERATION_MARKERS
            .iter()
            .find(|(marker, _)| operation_id.contains(marker))
            .map(|(_, kind)| *kind)
    }

    /// Returns stable operation kind value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebhookUpdated => "webhook_updated",
            Self::WebhookCreated => "webhook_created",
            Self::LegacyAgentSettingsUpdated => "legacy_agent_settings_updated",
            Self::AgentUpdated => "agent_updated",
            Self::AgentCreated => "agent_created",
            Self::FulfillmentUpdated => "fulfillment_updated",
        }
    }
}
