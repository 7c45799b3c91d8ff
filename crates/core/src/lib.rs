//! Shared primitives for all Rust crates in agentguard.

#![forbid(unsafe_code)]

/// Remote management API failure primitives.
pub mod remote;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use remote::{RemoteError, RemoteErrorCode};

/// Result type used across agentguard crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Inbound event envelope could not be decoded, or lacks a field the
    /// selected remediation needs.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Management API call failed while remediating a resource.
    #[error("remediation failed: {0}")]
    Remediation(#[from] RemoteError),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
