use agentguard_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Administrative audit record reduced to the fields remediation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    operation_id: NonEmptyString,
    resource_name: Option<String>,
    region: Option<String>,
    request_parent: Option<String>,
}

impl AuditEvent {
    /// Creates an audit event for the given operation identifier.
    pub fn new(operation_id: impl Into<String>) -> AppResult<Self> {
        let operation_id = NonEmptyString::new(operation_id).map_err(|_| {
            AppError::MalformedEvent("audit record method must not be empty".to_owned())
        })?;

        Ok(Self {
            operation_id,
            resource_name: None,
            region: None,
            request_parent: None,
        })
    }

    /// Sets the affected resource name.
    #[must_use]
    pub fn with_resource_name(mut self, resource_name: Option<String>) -> Self {
        self.resource_name = non_blank(resource_name);
        self
    }

    /// Sets the resource region.
    #[must_use]
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = non_blank(region);
        self
    }

    /// Sets the creation request parent.
    #[must_use]
    pub fn with_request_parent(mut self, request_parent: Option<String>) -> Self {
        self.request_parent = non_blank(request_parent);
        self
    }

    /// Returns the raw operation identifier (the log "method").
    #[must_use]
    pub fn operation_id(&self) -> &str {
        self.operation_id.as_str()
    }

    /// Returns the affected resource name, if present.
    #[must_use]
    pub fn resource_name(&self) -> Option<&str> {
        self.resource_name.as_deref()
    }

    /// Returns the resource region, if present.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Returns the creation request parent, if present.
    #[must_use]
    pub fn request_parent(&self) -> Option<&str> {
        self.request_parent.as_deref()
    }

    /// Returns the resource name or fails when the record lacks it.
    pub fn require_resource_name(&self) -> AppResult<&str> {
        self.resource_name().ok_or_else(|| {
            AppError::MalformedEvent(format!(
                "audit record for '{}' is missing protoPayload.resourceName",
                self.operation_id()
            ))
        })
    }

    /// Returns the request parent or fails when the record lacks it.
    pub fn require_request_parent(&self) -> AppResult<&str> {
        self.request_parent().ok_or_else(|| {
            AppError::MalformedEvent(format!(
                "audit record for '{}' is missing protoPayload.request.parent",
                self.operation_id()
            ))
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
