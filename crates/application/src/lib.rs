//! Application services and ports.

#![forbid(unsafe_code)]

mod event_decoder;
mod policy_ports;
mod policy_service;

pub use event_decoder::{EventEnvelope, decode_event};
pub use policy_ports::{
    AccessTokenProvider, AgentApi, FulfillmentApi, LegacyAgentApi, ManagementApiPorts, WebhookApi,
};
pub use policy_service::PolicyEnforcementService;
