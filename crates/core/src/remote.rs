use std::fmt::{Display, Formatter};

/// Classification of a management API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorCode {
    /// Target resource does not exist at the called endpoint.
    NotFound,
    /// Caller identity lacks permission on the resource.
    PermissionDenied,
    /// Caller credentials were missing or rejected.
    Unauthenticated,
    /// Transient unavailability, throttling or transport failure.
    Unavailable,
    /// Any other remote failure.
    Other,
}

impl RemoteErrorCode {
    /// Returns stable code value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::Unauthenticated => "unauthenticated",
            Self::Unavailable => "unavailable",
            Self::Other => "other",
        }
    }

    /// Classifies a response by the platform status string when present,
    /// falling back to the HTTP status code.
    #[must_use]
    pub fn classify(http_status: u16, platform_status: Option<&str>) -> Self {
        match platform_status {
            Some("NOT_FOUND") => Self::NotFound,
            Some("PERMISSION_DENIED") => Self::PermissionDenied,
            Some("UNAUTHENTICATED") => Self::Unauthenticated,
            Some("UNAVAILABLE" | "RESOURCE_EXHAUSTED" | "DEADLINE_EXCEEDED") => Self::Unavailable,
            _ => match http_status {
                404 => Self::NotFound,
                403 => Self::PermissionDenied,
                401 => Self::Unauthenticated,
                429 | 500..=599 => Self::Unavailable,
                _ => Self::Other,
            },
        }
    }
}

impl Display for RemoteErrorCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Failure reported by (or while reaching) the remote management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    operation: String,
    code: RemoteErrorCode,
    http_status: Option<u16>,
    message: String,
}

impl RemoteError {
    /// Creates a remote error for the named API operation.
    #[must_use]
    pub fn new(
        operation: impl Into<String>,
        code: RemoteErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            code,
            http_status: None,
            message: message.into(),
        }
    }

    /// Attaches the HTTP status returned by the remote API.
    #[must_use]
    pub fn with_http_status(mut self, http_status: u16) -> Self {
        self.http_status = Some(http_status);
        self
    }

    /// Returns the API operation that failed.
    #[must_use]
    pub fn operation(&self) -> &str {
        self.operation.as_str()
    }

    /// Returns the failure classification.
    #[must_use]
    pub fn code(&self) -> RemoteErrorCode {
        self.code
    }

    /// Returns the HTTP status, if a response was received.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Returns the remote error message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl Display for RemoteError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{} failed ({}): {}",
            self.operation, self.code, self.message
        )
    }
}

impl std::error::Error for RemoteError {}

#[cfg(test)]
mod tests {
    use super::RemoteErrorCode;

    #[test]
    fn platform_status_takes_precedence_over_http_status() {
        assert_eq!(
            RemoteErrorCode::classify(400, Some("NOT_FOUND")),
            RemoteErrorCode::NotFound
        );
        assert_eq!(
            RemoteErrorCode::classify(403, None),
            RemoteErrorCode::PermissionDenied
        );
    }

    #[test]
    fn server_errors_and_throttling_are_unavailable() {
        assert_eq!(RemoteErrorCode::classify(503, None), RemoteErrorCode::Unavailable);
        assert_eq!(RemoteErrorCode::classify(429, None), RemoteErrorCode::Unavailable);
        assert_eq!(RemoteErrorCode::classify(400, None), RemoteErrorCode::Other);
    }
}
