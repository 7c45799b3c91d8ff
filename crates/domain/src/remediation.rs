use serde::Serialize;

use crate::{Agent, Fulfillment, LegacyAgent, OperationKind, Webhook};

/// Resources modified by one remediation action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "resources", rename_all = "snake_case")]
pub enum RemediationResult {
    /// One agent with enforced logging settings.
    Agent(Agent),
    /// Every agent under a parent with enforced logging settings.
    Agents(Vec<Agent>),
    /// Legacy agent with enforced logging flag.
    LegacyAgent(LegacyAgent),
    /// One webhook with scrubbed credentials.
    Webhook(Webhook),
    /// Every webhook of an agent with scrubbed credentials.
    Webhooks(Vec<Webhook>),
    /// Fulfillment with scrubbed credentials.
    Fulfillment(Fulfillment),
}

impl RemediationResult {
    /// Returns names of all modified resources.
    #[must_use]
    pub fn modified_resource_names(&self) -> Vec<&str> {
        match self {
            Self::Agent(agent) => vec![agent.name.as_str()],
            Self::Agents(agents) => agents.iter().map(|agent| agent.name.as_str()).collect(),
            Self::LegacyAgent(agent) => vec![agent.parent.as_str()],
            Self::Webhook(webhook) => vec![webhook.name.as_str()],
            Self::Webhooks(webhooks) => webhooks
                .iter()
                .map(|webhook| webhook.name.as_str())
                .collect(),
            Self::Fulfillment(fulfillment) => vec![fulfillment.name.as_str()],
        }
    }
}

/// Outcome of handling one audit event.
#[derive(Debug, Clone, PartialEq)]
pub enum RemediationOutcome {
    /// The operation was recognized and remediated.
    Handled {
        /// Matched operation class.
        kind: OperationKind,
        /// Modified resources.
        result: RemediationResult,
    },
    /// The operation needs no remediation; nothing was called.
    Unhandled {
        /// Raw operation id received.
        operation_id: String,
    },
}

impl RemediationOutcome {
    /// Returns whether a remediation ran.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }
}
