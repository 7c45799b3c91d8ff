//! Management API resource representations.
//!
//! Only the fields remediation reads or writes are modeled; everything else
//! the API returns is carried in `extra` so a fetched resource can be sent
//! back without losing configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::LoggingPolicy;

/// Conversational agent (CX API).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Full resource name, `projects/<p>/locations/<l>/agents/<a>`.
    #[serde(default)]
    pub name: String,
    /// Human readable agent name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// Nested advanced settings holding the logging toggles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_settings: Option<AdvancedSettings>,
    /// Unmodeled agent fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Agent {
    /// Creates an agent with only its resource name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets both logging toggles to the policy value, keeping any other
    /// advanced settings.
    pub fn apply_logging_policy(&mut self, policy: LoggingPolicy) {
        let logging_settings = self
            .advanced_settings
            .get_or_insert_with(AdvancedSettings::default)
            .logging_settings
            .get_or_insert_with(LoggingSettings::default);

        logging_settings.enable_stackdriver_logging = policy.is_enabled();
        logging_settings.enable_interaction_logging = policy.is_enabled();
    }

    /// Returns whether both logging toggles already match the policy.
    #[must_use]
    pub fn complies_with(&self, policy: LoggingPolicy) -> bool {
        self.advanced_settings
            .as_ref()
            .and_then(|settings| settings.logging_settings.as_ref())
            .is_some_and(|logging| {
                logging.enable_stackdriver_logging == policy.is_enabled()
                    && logging.enable_interaction_logging == policy.is_enabled()
            })
    }
}

/// Agent advanced settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettings {
    /// Logging toggles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_settings: Option<LoggingSettings>,
    /// Unmodeled advanced settings (speech, DTMF, audio export).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Agent logging toggles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    /// Platform (Cloud Logging) logging.
    #[serde(default)]
    pub enable_stackdriver_logging: bool,
    /// Conversation interaction logging.
    #[serde(default)]
    pub enable_interaction_logging: bool,
    /// Unmodeled logging settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Agent representation on the legacy (ES) flat API.
///
/// The legacy API exposes one `enable_logging` flag and cannot toggle
/// interaction logging separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAgent {
    /// Owning project, `projects/<p>`.
    #[serde(default)]
    pub parent: String,
    /// Platform logging flag.
    #[serde(default)]
    pub enable_logging: bool,
    /// Unmodeled agent fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LegacyAgent {
    /// Builds a set-agent payload carrying only the logging flag.
    #[must_use]
    pub fn logging_update(parent: impl Into<String>, policy: LoggingPolicy) -> Self {
        Self {
            parent: parent.into(),
            enable_logging: policy.is_enabled(),
            extra: Map::new(),
        }
    }
}

/// Generic web service configuration shared by webhooks and fulfillments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericWebService {
    /// Target URI.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// Static basic-auth user name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    /// Static basic-auth password.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Unmodeled fields, including request headers.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenericWebService {
    /// Clears the static basic-auth credentials.
    ///
    /// Request headers are left as they are even when they carry tokens.
    pub fn clear_credentials(&mut self) {
        self.username.clear();
        self.password.clear();
    }

    /// Returns whether a username or password is still set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }
}

/// Agent webhook (CX API).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Full resource name, `.../agents/<a>/webhooks/<w>`.
    #[serde(default)]
    pub name: String,
    /// Human readable webhook name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// Web service configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_web_service: Option<GenericWebService>,
    /// Unmodeled webhook fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Webhook {
    /// Creates a webhook with only its resource name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Clears static credentials of the web service, if any.
    pub fn clear_credentials(&mut self) {
        if let Some(web_service) = self.generic_web_service.as_mut() {
            web_service.clear_credentials();
        }
    }

    /// Returns whether static credentials are still set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.generic_web_service
            .as_ref()
            .is_some_and(GenericWebService::has_credentials)
    }
}

/// Agent fulfillment (ES API).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulfillment {
    /// Full resource name, `projects/<p>/agent/fulfillment`.
    #[serde(default)]
    pub name: String,
    /// Web service configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_web_service: Option<GenericWebService>,
    /// Unmodeled fulfillment fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Fulfillment {
    /// Builds an update payload that clears the static credentials of the
    /// named fulfillment.
    #[must_use]
    pub fn without_credentials(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_web_service: Some(GenericWebService::default()),
            extra: Map::new(),
        }
    }

    /// Returns whether static credentials are still set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.generic_web_service
            .as_ref()
            .is_some_and(GenericWebService::has_credentials)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Agent, Webhook};
    use crate::LoggingPolicy;

    #[test]
    fn applying_logging_policy_keeps_unrelated_settings() {
        let agent = serde_json::from_value::<Agent>(json!({
            "name": "projects/p/locations/global/agents/a",
            "displayName": "Support",
            "defaultLanguageCode": "en",
            "advancedSettings": {
                "audioExportGcsDestination": {"uri": "gs://bucket"},
                "loggingSettings": {
                    "enableStackdriverLogging": false,
                    "enableInteractionLogging": true
                }
            }
        }));
        assert!(agent.is_ok());
        let mut agent = agent.unwrap_or_default();

        agent.apply_logging_policy(LoggingPolicy::new(true));

        assert!(agent.complies_with(LoggingPolicy::new(true)));
        let serialized = serde_json::to_value(&agent).unwrap_or_default();
        assert_eq!(serialized["defaultLanguageCode"], "en");
        assert_eq!(
            serialized["advancedSettings"]["audioExportGcsDestination"]["uri"],
            "gs://bucket"
        );
        assert_eq!(
            serialized["advancedSettings"]["loggingSettings"]["enableStackdriverLogging"],
            true
        );
    }

    #[test]
    fn agent_without_advanced_settings_does_not_comply() {
        let agent = Agent::named("projects/p/locations/global/agents/a");
        assert!(!agent.complies_with(LoggingPolicy::new(false)));
    }

    #[test]
    fn clearing_credentials_keeps_headers() {
        let webhook = serde_json::from_value::<Webhook>(json!({
            "name": "projects/p/locations/l/agents/a/webhooks/w",
            "genericWebService": {
                "uri": "https://hooks.example.com",
                "username": "svc",
                "password": "hunter2",
                "requestHeaders": {"Authorization": "Bearer abc"}
            }
        }));
        assert!(webhook.is_ok());
        let mut webhook = webhook.unwrap_or_default();
        assert!(webhook.has_credentials());

        webhook.clear_credentials();

        assert!(!webhook.has_credentials());
        let serialized = serde_json::to_value(&webhook).unwrap_or_default();
        assert!(serialized["genericWebService"].get("username").is_none());
        assert_eq!(
            serialized["genericWebService"]["requestHeaders"]["Authorization"],
            "Bearer abc"
        );
    }
}
