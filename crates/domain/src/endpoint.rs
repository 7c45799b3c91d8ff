use std::fmt::{Display, Formatter};

use agentguard_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default management API domain.
pub const DEFAULT_API_DOMAIN: &str = "dialogflow.googleapis.com";

/// Region literal served by the unprefixed endpoint.
pub const GLOBAL_REGION: &str = "global";

/// Resolved management API base address for one event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiEndpoint {
    base_url: String,
}

impl ApiEndpoint {
    /// Creates an endpoint from a base URL, trimming trailing slashes.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Returns the base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

impl Display for ApiEndpoint {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.base_url.as_str())
    }
}

/// Maps resource regions to regional management API endpoints.
///
/// Named regions are served by `https://<region>-<domain>`; the `global`
/// region, and records without a region, by `https://<domain>`. Calling the
/// wrong host for a regional agent surfaces as a remote not-found error, so
/// this convention must match the platform exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResolver {
    base_domain: String,
    endpoint_override: Option<ApiEndpoint>,
}

impl EndpointResolver {
    /// Creates a resolver for the given API domain.
    pub fn new(base_domain: impl Into<String>) -> AppResult<Self> {
        let base_domain = base_domain.into().trim().to_owned();
        if base_domain.is_empty() {
            return Err(AppError::Validation(
                "management API domain must not be empty".to_owned(),
            ));
        }

        if base_domain.contains("://") || base_domain.contains('/') {
            return Err(AppError::Validation(format!(
                "management API domain '{base_domain}' must be a bare host name"
            )));
        }

        Ok(Self {
            base_domain,
            endpoint_override: None,
        })
    }

    /// Routes every region to one fixed endpoint.
    #[must_use]
    pub fn with_override(mut self, endpoint: ApiEndpoint) -> Self {
        self.endpoint_override = Some(endpoint);
        self
    }

    /// Returns the configured API domain.
    #[must_use]
    pub fn base_domain(&self) -> &str {
        self.base_domain.as_str()
    }

    /// Resolves the endpoint serving resources in `region`.
    ///
    /// The region comes from the audit record and ends up in the host name,
    /// so anything but a lowercase location id is rejected as malformed.
    pub fn resolve(&self, region: Option<&str>) -> AppResult<ApiEndpoint> {
        let region = region.map(str::trim).filter(|region| !region.is_empty());
        if let Some(region) = region.filter(|region| !is_location_id(region)) {
            return Err(AppError::MalformedEvent(format!(
                "region '{region}' is not a valid location id"
            )));
        }

        if let Some(endpoint) = &self.endpoint_override {
            return Ok(endpoint.clone());
        }

        Ok(match region {
            None | Some(GLOBAL_REGION) => ApiEndpoint::new(format!("https://{}", self.base_domain)),
            Some(region) => ApiEndpoint::new(format!("https://{region}-{}", self.base_domain)),
        })
    }
}

/// Lowercase alphanumeric words joined by single hyphens.
fn is_location_id(region: &str) -> bool {
    region.split('-').all(|word| {
        !word.is_empty()
            && word
                .bytes()
                .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit())
    })
}

impl Default for EndpointResolver {
    fn default() -> Self {
        Self {
            base_domain: DEFAULT_API_DOMAIN.to_owned(),
            endpoint_override: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use agentguard_core::AppError;
    use proptest::prelude::*;

    use super::{ApiEndpoint, EndpointResolver};

    fn base_url(resolver: &EndpointResolver, region: Option<&str>) -> String {
        resolver
            .resolve(region)
            .map(|endpoint| endpoint.base_url().to_owned())
            .unwrap_or_default()
    }

    #[test]
    fn global_and_missing_regions_share_the_unprefixed_endpoint() {
        let resolver = EndpointResolver::default();

        assert_eq!(base_url(&resolver, Some("global")), base_url(&resolver, None));
        assert_eq!(base_url(&resolver, Some("")), base_url(&resolver, None));
        assert_eq!(
            base_url(&resolver, None),
            "https://dialogflow.googleapis.com"
        );
    }

    #[test]
    fn named_region_prefixes_the_domain() {
        let resolver = EndpointResolver::default();

        assert_eq!(
            base_url(&resolver, Some("europe-west1")),
            "https://europe-west1-dialogflow.googleapis.com"
        );
    }

    #[test]
    fn override_applies_to_every_region() {
        let resolver = EndpointResolver::default()
            .with_override(ApiEndpoint::new("http://127.0.0.1:9000/"));

        assert_eq!(
            base_url(&resolver, Some("us-central1")),
            "http://127.0.0.1:9000"
        );
        assert_eq!(base_url(&resolver, None), "http://127.0.0.1:9000");
    }

    #[test]
    fn regions_that_would_change_the_host_are_malformed() {
        let resolver = EndpointResolver::default();

        for region in [
            "attacker.example#",
            "evil.test:8443/",
            "us-central1/../x",
            "user@evil.test",
            "EU-West1",
            "us--central1",
            "-us",
        ] {
            assert!(
                matches!(resolver.resolve(Some(region)), Err(AppError::MalformedEvent(_))),
                "region {region:?} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_regions_are_rejected_even_with_override() {
        let resolver = EndpointResolver::default()
            .with_override(ApiEndpoint::new("http://127.0.0.1:9000"));

        assert!(matches!(
            resolver.resolve(Some("attacker.example#")),
            Err(AppError::MalformedEvent(_))
        ));
    }

    #[test]
    fn domain_with_scheme_is_rejected() {
        assert!(EndpointResolver::new("https://dialogflow.googleapis.com").is_err());
        assert!(EndpointResolver::new("   ").is_err());
    }

    proptest! {
        #[test]
        fn named_regions_resolve_to_prefixed_host(region in "[a-z]{2,12}-[a-z]{2,10}[0-9]") {
            let resolver = EndpointResolver::default();

            prop_assert_eq!(
                base_url(&resolver, Some(region.as_str())),
                format!("https://{region}-dialogflow.googleapis.com")
            );
        }

        #[test]
        fn resolved_host_is_always_under_the_api_domain(region in "\\PC{0,24}") {
            let resolver = EndpointResolver::default();

            if let Ok(endpoint) = resolver.resolve(Some(region.as_str())) {
                let host = endpoint
                    .base_url()
                    .strip_prefix("https://")
                    .unwrap_or_default();
                prop_assert!(host.ends_with("dialogflow.googleapis.com"));
                prop_assert!(!host.contains(['/', '#', '?', '@', ':']));
            }
        }
    }
}
