use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use agentguard_core::AppError;
use agentguard_domain::{
    ApiEndpoint, DEFAULT_API_DOMAIN, DEFAULT_LOGGING_POLICY, EndpointResolver, LoggingPolicy,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_API_HOST: &str = "0.0.0.0";
const DEFAULT_API_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
const DEFAULT_METADATA_SERVER_URL: &str = "http://metadata.google.internal";

/// Where management API access tokens come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSourceConfig {
    Static(String),
    MetadataServer { base_url: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub logging_policy: LoggingPolicy,
    pub endpoint_resolver: EndpointResolver,
    pub request_timeout: Duration,
    pub token_source: TokenSourceConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_host = optional("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_owned());
        let api_port = match optional("PORT").or_else(|| optional("API_PORT")) {
            Some(value) => parse_value::<u16>("PORT", value.as_str())?,
            None => DEFAULT_API_PORT,
        };

        let logging_policy = match optional("AGENT_LOGGING_POLICY") {
            Some(value) => LoggingPolicy::new(parse_bool("AGENT_LOGGING_POLICY", value.as_str())?),
            None => DEFAULT_LOGGING_POLICY,
        };

        let mut endpoint_resolver = EndpointResolver::new(
            optional("MANAGEMENT_API_DOMAIN").unwrap_or_else(|| DEFAULT_API_DOMAIN.to_owned()),
        )?;
        if let Some(value) = optional("MANAGEMENT_API_ENDPOINT_OVERRIDE") {
            endpoint_resolver = endpoint_resolver.with_override(parse_endpoint_override(
                "MANAGEMENT_API_ENDPOINT_OVERRIDE",
                value.as_str(),
            )?);
        }

        let timeout_seconds = match optional("MANAGEMENT_API_TIMEOUT_SECONDS") {
            Some(value) => parse_value::<u64>("MANAGEMENT_API_TIMEOUT_SECONDS", value.as_str())?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };
        if timeout_seconds == 0 {
            return Err(AppError::Validation(
                "MANAGEMENT_API_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        let token_source = match optional("GOOGLE_OAUTH_ACCESS_TOKEN") {
            Some(token) => TokenSourceConfig::Static(token),
            None => TokenSourceConfig::MetadataServer {
                base_url: optional("METADATA_SERVER_URL")
                    .unwrap_or_else(|| DEFAULT_METADATA_SERVER_URL.to_owned()),
            },
        };

        Ok(Self {
            api_host,
            api_port,
            logging_policy,
            endpoint_resolver,
            request_timeout: Duration::from_secs(timeout_seconds),
            token_source,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "invalid {name} value '{value}': expected true or false"
        ))),
    }
}

fn parse_endpoint_override(name: &str, value: &str) -> Result<ApiEndpoint, AppError> {
    let url = reqwest::Url::parse(value.trim())
        .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "{name} must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(ApiEndpoint::new(value.trim()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();
        ApiConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_port, 8080);
        assert!(config.logging_policy.is_enabled());
        assert_eq!(config.endpoint_resolver.base_domain(), DEFAULT_API_DOMAIN);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(
            config.token_source,
            TokenSourceConfig::MetadataServer {
                base_url: DEFAULT_METADATA_SERVER_URL.to_owned()
            }
        );
        assert!(config.socket_address().is_ok());
    }

    #[test]
    fn port_takes_precedence_over_api_port() {
        let config = config_from(&[("PORT", "9000"), ("API_PORT", "9100")]);
        assert_eq!(config.map(|config| config.api_port).unwrap_or_default(), 9000);
    }

    #[test]
    fn logging_policy_can_be_disabled() {
        let config = config_from(&[("AGENT_LOGGING_POLICY", "false")]);
        assert!(
            config
                .map(|config| !config.logging_policy.is_enabled())
                .unwrap_or_default()
        );
    }

    #[test]
    fn invalid_values_are_validation_errors() {
        for pairs in [
            [("AGENT_LOGGING_POLICY", "sometimes")],
            [("PORT", "http")],
            [("MANAGEMENT_API_TIMEOUT_SECONDS", "0")],
            [("MANAGEMENT_API_DOMAIN", "https://dialogflow.googleapis.com")],
            [("MANAGEMENT_API_ENDPOINT_OVERRIDE", "ftp://localhost")],
        ] {
            assert!(matches!(config_from(&pairs), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn endpoint_override_applies_to_every_region() {
        let config = config_from(&[("MANAGEMENT_API_ENDPOINT_OVERRIDE", "http://127.0.0.1:9090/")]);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());

        assert_eq!(
            config
                .endpoint_resolver
                .resolve(Some("europe-west1"))
                .map(|endpoint| endpoint.base_url().to_owned())
                .unwrap_or_default(),
            "http://127.0.0.1:9090"
        );
    }

    #[test]
    fn static_token_wins_over_metadata_server() {
        let config = config_from(&[("GOOGLE_OAUTH_ACCESS_TOKEN", "ya29.token")]);
        assert_eq!(
            config.map(|config| config.token_source).ok(),
            Some(TokenSourceConfig::Static("ya29.token".to_owned()))
        );
    }
}
