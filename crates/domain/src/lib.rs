//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit_event;
mod endpoint;
mod field_mask;
mod operation;
mod policy;
mod remediation;
mod resources;

pub use audit_event::AuditEvent;
pub use endpoint::{ApiEndpoint, DEFAULT_API_DOMAIN, EndpointResolver, GLOBAL_REGION};
pub use field_mask::FieldMask;
pub use operation::{OPERATION_MARKERS, OperationKind};
pub use policy::{DEFAULT_LOGGING_POLICY, LoggingPolicy};
pub use remediation::{RemediationOutcome, RemediationResult};
pub use resources::{
    AdvancedSettings, Agent, Fulfillment, GenericWebService, LegacyAgent, LoggingSettings, Webhook,
};
