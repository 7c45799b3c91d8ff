use agentguard_core::{AppError, AppResult};
use agentguard_domain::AuditEvent;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

/// Inbound event envelope carrying a base64-encoded audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Base64 of the UTF-8 JSON audit record.
    pub data: String,
}

impl EventEnvelope {
    /// Creates an envelope from already-encoded data.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditRecord {
    #[serde(default)]
    resource: Option<MonitoredResource>,
    #[serde(default)]
    proto_payload: Option<ProtoPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct MonitoredResource {
    #[serde(default)]
    labels: Option<ResourceLabels>,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceLabels {
    #[serde(default)]
    method: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProtoPayload {
    #[serde(default)]
    resource_name: Option<String>,
    #[serde(default)]
    resource_location: Option<ResourceLocation>,
    #[serde(default)]
    request: Option<RequestPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceLocation {
    #[serde(default)]
    current_locations: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RequestPayload {
    #[serde(default)]
    parent: Option<String>,
}

/// Decodes an event envelope into an audit event.
///
/// Only the operation id is required here. Resource name, region and
/// request parent are optional and checked by the remediation that needs
/// them.
pub fn decode_event(envelope: &EventEnvelope) -> AppResult<AuditEvent> {
    let bytes = decode_base64(envelope.data.trim())?;
    let payload = String::from_utf8(bytes).map_err(|error| {
        AppError::MalformedEvent(format!("event data is not valid UTF-8: {error}"))
    })?;
    let record = serde_json::from_str::<AuditRecord>(payload.as_str()).map_err(|error| {
        AppError::MalformedEvent(format!("event data is not a JSON audit record: {error}"))
    })?;

    let operation_id = record
        .resource
        .and_then(|resource| resource.labels)
        .and_then(|labels| labels.method)
        .ok_or_else(|| {
            AppError::MalformedEvent("audit record is missing resource.labels.method".to_owned())
        })?;
    let proto_payload = record.proto_payload.unwrap_or_default();
    let region = proto_payload
        .resource_location
        .and_then(|location| location.current_locations.into_iter().next());
    let request_parent = proto_payload.request.and_then(|request| request.parent);

    Ok(AuditEvent::new(operation_id)?
        .with_resource_name(proto_payload.resource_name)
        .with_region(region)
        .with_request_parent(request_parent))
}

fn decode_base64(data: &str) -> AppResult<Vec<u8>> {
    if data.is_empty() {
        return Err(AppError::MalformedEvent("event data is empty".to_owned()));
    }

    [STANDARD, URL_SAFE, STANDARD_NO_PAD, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(data).ok())
        .ok_or_else(|| AppError::MalformedEvent("event data is not valid base64".to_owned()))
}

#[cfg(test)]
mod tests {
    use agentguard_core::AppError;
    use base64::Engine;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use serde_json::json;

    use super::{EventEnvelope, decode_event};

    fn envelope_for(record: &serde_json::Value) -> EventEnvelope {
        EventEnvelope::new(STANDARD.encode(record.to_string()))
    }

    #[test]
    fn extracts_method_region_resource_and_parent() {
        let envelope = envelope_for(&json!({
            "resource": {"labels": {"method": "google.cloud.dialogflow.cx.v3.Agents.CreateAgent"}},
            "protoPayload": {
                "resourceName": "projects/p/locations/us-central1/agents/a",
                "resourceLocation": {"currentLocations": ["us-central1", "ignored"]},
                "request": {
                    "@type": "type.googleapis.com/google.cloud.dialogflow.cx.v3.CreateAgentRequest",
                    "parent": "projects/p/locations/us-central1"
                }
            }
        }));

        let event = decode_event(&envelope);
        assert!(event.is_ok());
        let event = event.unwrap_or_else(|_| unreachable!());
        assert_eq!(
            event.operation_id(),
            "google.cloud.dialogflow.cx.v3.Agents.CreateAgent"
        );
        assert_eq!(event.region(), Some("us-central1"));
        assert_eq!(
            event.resource_name(),
            Some("projects/p/locations/us-central1/agents/a")
        );
        assert_eq!(event.request_parent(), Some("projects/p/locations/us-central1"));
    }

    #[test]
    fn empty_location_list_means_no_region() {
        let envelope = envelope_for(&json!({
            "resource": {"labels": {"method": "Webhooks.UpdateWebhook"}},
            "protoPayload": {
                "resourceName": "projects/p/locations/global/agents/a/webhooks/w",
                "resourceLocation": {"currentLocations": []}
            }
        }));

        let event = decode_event(&envelope).unwrap_or_else(|_| unreachable!());
        assert_eq!(event.region(), None);
        assert_eq!(event.request_parent(), None);
    }

    #[test]
    fn url_safe_unpadded_data_is_accepted() {
        let record = json!({"resource": {"labels": {"method": "Agents.UpdateAgent"}}});
        let envelope = EventEnvelope::new(URL_SAFE_NO_PAD.encode(record.to_string()));

        assert!(decode_event(&envelope).is_ok());
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let result = decode_event(&EventEnvelope::new("%%% not base64 %%%"));
        assert!(matches!(result, Err(AppError::MalformedEvent(_))));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let result = decode_event(&EventEnvelope::new(STANDARD.encode([0xff_u8, 0xfe, 0xfd])));
        assert!(matches!(result, Err(AppError::MalformedEvent(_))));
    }

    #[test]
    fn non_json_payload_is_malformed() {
        let result = decode_event(&EventEnvelope::new(STANDARD.encode("not json")));
        assert!(matches!(result, Err(AppError::MalformedEvent(_))));
    }

    #[test]
    fn missing_method_is_malformed() {
        let envelope = envelope_for(&json!({"protoPayload": {"resourceName": "projects/p"}}));
        let result = decode_event(&envelope);
        assert!(matches!(result, Err(AppError::MalformedEvent(_))));
    }
}
