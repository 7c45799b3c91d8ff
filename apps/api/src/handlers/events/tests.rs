use std::sync::Arc;

use agentguard_application::{ManagementApiPorts, PolicyEnforcementService};
use agentguard_domain::{
    Agent, EndpointResolver, GenericWebService, LoggingPolicy, Webhook,
};
use agentguard_infrastructure::InMemoryManagementApi;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

use super::*;
use crate::api_router::build_router;
use crate::dto::PushMessage;

const AGENT: &str = "projects/p1/locations/global/agents/a1";

fn app_state(api: Arc<InMemoryManagementApi>) -> AppState {
    AppState {
        policy_service: PolicyEnforcementService::new(
            ManagementApiPorts::from_client(api),
            EndpointResolver::default(),
            LoggingPolicy::new(true),
        ),
    }
}

fn encoded_audit_record(method: &str, resource_name: &str) -> String {
    let record = json!({
        "resource": {"labels": {"method": method}},
        "protoPayload": {
            "resourceName": resource_name,
            "resourceLocation": {"currentLocations": ["global"]},
        },
    });
    STANDARD.encode(record.to_string())
}

fn push_request(data: String) -> EventDeliveryRequest {
    EventDeliveryRequest::Push {
        message: PushMessage {
            data,
            message_id: Some("1234".to_owned()),
        },
        subscription: Some("projects/p1/subscriptions/agent-audit".to_owned()),
    }
}

async fn seeded_api() -> Arc<InMemoryManagementApi> {
    let api = Arc::new(InMemoryManagementApi::new());
    api.seed_agent(Agent::named(AGENT)).await;
    let mut webhook = Webhook::named(format!("{AGENT}/webhooks/w1"));
    webhook.generic_web_service = Some(GenericWebService {
        uri: "https://hooks.example.com".to_owned(),
        username: "user".to_owned(),
        password: "secret".to_owned(),
        ..GenericWebService::default()
    });
    api.seed_webhook(webhook).await;
    api
}

#[tokio::test]
async fn webhook_update_event_scrubs_credentials() {
    let api = seeded_api().await;
    let webhook_name = format!("{AGENT}/webhooks/w1");

    let response = receive_event_handler(
        State(app_state(api.clone())),
        Json(push_request(encoded_audit_record(
            "google.cloud.dialogflow.v3.Webhooks.UpdateWebhook",
            webhook_name.as_str(),
        ))),
    )
    .await;
    assert!(response.is_ok());
    let Json(response) = response.unwrap_or_else(|_| unreachable!());

    assert_eq!(response.status, "handled");
    assert_eq!(response.kind, Some("webhook_updated"));
    assert_eq!(response.modified_resources, vec![webhook_name.clone()]);
    assert!(
        api.webhook(webhook_name.as_str())
            .await
            .is_some_and(|webhook| !webhook.has_credentials())
    );
}

#[tokio::test]
async fn agent_update_event_enforces_logging() {
    let api = seeded_api().await;

    let response = receive_event_handler(
        State(app_state(api.clone())),
        Json(EventDeliveryRequest::Bare {
            data: encoded_audit_record("google.cloud.dialogflow.v3.Agents.UpdateAgent", AGENT),
        }),
    )
    .await;
    assert!(response.is_ok());
    assert!(
        api.agent(AGENT)
            .await
            .is_some_and(|agent| agent.complies_with(LoggingPolicy::new(true)))
    );
}

#[tokio::test]
async fn unrecognized_operation_is_acknowledged_without_changes() {
    let api = seeded_api().await;

    let response = receive_event_handler(
        State(app_state(api.clone())),
        Json(push_request(encoded_audit_record(
            "google.cloud.dialogflow.v3.Flows.UpdateFlow",
            AGENT,
        ))),
    )
    .await;
    assert!(response.is_ok());
    let Json(response) = response.unwrap_or_else(|_| unreachable!());

    assert_eq!(response.status, "unhandled");
    assert_eq!(
        response.operation_id.as_deref(),
        Some("google.cloud.dialogflow.v3.Flows.UpdateFlow")
    );
    assert_eq!(api.update_count().await, 0);
}

#[tokio::test]
async fn malformed_pushed_event_is_acknowledged_as_rejected() {
    let api = seeded_api().await;

    let response = receive_event_handler(
        State(app_state(api.clone())),
        Json(push_request("%%% not base64 %%%".to_owned())),
    )
    .await;
    assert!(response.is_ok());
    let response = response.unwrap_or_else(|_| unreachable!());
    assert_eq!(response.0.status, "rejected");
    assert!(
        response
            .0
            .error
            .as_deref()
            .is_some_and(|reason| reason.contains("not valid base64"))
    );
    assert_eq!(response.into_response().status(), StatusCode::OK);
    assert_eq!(api.update_count().await, 0);
}

#[tokio::test]
async fn malformed_bare_event_is_bad_request() {
    let api = seeded_api().await;

    let response = receive_event_handler(
        State(app_state(api.clone())),
        Json(EventDeliveryRequest::Bare {
            data: "%%% not base64 %%%".to_owned(),
        }),
    )
    .await;

    let Err(error) = response else {
        unreachable!("expected a malformed event error");
    };
    assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    assert_eq!(api.update_count().await, 0);
}

#[tokio::test]
async fn missing_remote_resource_is_bad_gateway() {
    let api = seeded_api().await;

    let response = receive_event_handler(
        State(app_state(api)),
        Json(push_request(encoded_audit_record(
            "google.cloud.dialogflow.v3.Agents.UpdateAgent",
            "projects/p1/locations/global/agents/missing",
        ))),
    )
    .await;

    let Err(error) = response else {
        unreachable!("expected a remediation error");
    };
    assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn router_serves_health_and_push_deliveries() {
    let api = seeded_api().await;
    let router = build_router(app_state(api));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await;
    assert!(listener.is_ok());
    let listener = listener.unwrap_or_else(|_| unreachable!());
    let address = listener.local_addr();
    assert!(address.is_ok());
    let address = address.unwrap_or_else(|_| unreachable!());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let client = reqwest::Client::new();

    let health = client.get(format!("http://{address}/health")).send().await;
    assert!(health.is_ok());
    let health = health.unwrap_or_else(|_| unreachable!());
    assert_eq!(health.status().as_u16(), 200);

    let delivery = client
        .post(format!("http://{address}/"))
        .json(&json!({
            "message": {
                "data": encoded_audit_record("google.cloud.dialogflow.v3.Agents.UpdateAgent", AGENT),
                "messageId": "42",
            },
            "subscription": "projects/p1/subscriptions/agent-audit",
        }))
        .send()
        .await;
    assert!(delivery.is_ok());
    let delivery = delivery.unwrap_or_else(|_| unreachable!());
    assert_eq!(delivery.status().as_u16(), 200);

    let body = delivery.json::<Value>().await.unwrap_or_default();
    assert_eq!(body["status"], json!("handled"));
    assert_eq!(body["kind"], json!("agent_updated"));

    let poison = client
        .post(format!("http://{address}/"))
        .json(&json!({
            "message": {"data": "not-base64!!", "messageId": "43"},
            "subscription": "projects/p1/subscriptions/agent-audit",
        }))
        .send()
        .await;
    assert!(poison.is_ok());
    let poison = poison.unwrap_or_else(|_| unreachable!());
    assert_eq!(poison.status().as_u16(), 200);
    let body = poison.json::<Value>().await.unwrap_or_default();
    assert_eq!(body["status"], json!("rejected"));
}
