use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Desired state of agent logging. Platform logging and interaction logging
/// are always set to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoggingPolicy(bool);

/// Logging policy applied when no override is configured.
pub const DEFAULT_LOGGING_POLICY: LoggingPolicy = LoggingPolicy(true);

impl LoggingPolicy {
    /// Creates a policy from the desired toggle value.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self(enabled)
    }

    /// Returns the desired toggle value.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.0
    }
}

impl Default for LoggingPolicy {
    fn default() -> Self {
        DEFAULT_LOGGING_POLICY
    }
}

impl Display for LoggingPolicy {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
