use agentguard_application::EventEnvelope;
use agentguard_domain::{RemediationOutcome, RemediationResult};
use serde::{Deserialize, Serialize};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Pub/Sub push message body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub data: String,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Incoming event delivery, either a push request or a bare envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EventDeliveryRequest {
    Push {
        message: PushMessage,
        #[serde(default)]
        subscription: Option<String>,
    },
    Bare {
        data: String,
    },
}

impl EventDeliveryRequest {
    /// Returns the push message id, when delivered by a subscription.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Push { message, .. } => message.message_id.as_deref(),
            Self::Bare { .. } => None,
        }
    }

    /// Returns the delivering subscription, if any.
    pub fn subscription(&self) -> Option<&str> {
        match self {
            Self::Push { subscription, .. } => subscription.as_deref(),
            Self::Bare { .. } => None,
        }
    }

    /// Returns whether the delivery came from a push subscription.
    pub fn is_push(&self) -> bool {
        matches!(self, Self::Push { .. })
    }

    pub fn into_envelope(self) -> EventEnvelope {
        match self {
            Self::Push { message, .. } => EventEnvelope::new(message.data),
            Self::Bare { data } => EventEnvelope::new(data),
        }
    }
}

/// Summary of how one event was handled.
#[derive(Debug, Serialize)]
pub struct EventHandledResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub modified_resources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EventHandledResponse {
    /// Acknowledgement for a delivery whose event can never be processed.
    pub fn rejected(reason: String) -> Self {
        Self {
            status: "rejected",
            operation_id: None,
            kind: None,
            modified_resources: Vec::new(),
            error: Some(reason),
        }
    }
}

impl From<RemediationOutcome> for EventHandledResponse {
    fn from(outcome: RemediationOutcome) -> Self {
        match outcome {
            RemediationOutcome::Handled { kind, result } => Self {
                status: "handled",
                operation_id: None,
                kind: Some(kind.as_str()),
                modified_resources: modified_resources(&result),
                error: None,
            },
            RemediationOutcome::Unhandled { operation_id } => Self {
                status: "unhandled",
                operation_id: Some(operation_id),
                kind: None,
                modified_resources: Vec::new(),
                error: None,
            },
        }
    }
}

fn modified_resources(result: &RemediationResult) -> Vec<String> {
    result
        .modified_resource_names()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
