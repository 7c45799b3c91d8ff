//! Access tokens from the compute metadata server.

use agentguard_application::AccessTokenProvider;
use agentguard_core::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
const REFRESH_MARGIN_SECONDS: i64 = 60;
const MAX_TOKEN_LIFETIME_SECONDS: u64 = 24 * 60 * 60;

/// Fetches the default service account token and caches it until shortly
/// before expiry.
pub struct MetadataServerTokenProvider {
    http_client: reqwest::Client,
    token_url: String,
    cached_token: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECONDS) > now
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

impl MetadataServerTokenProvider {
    /// Creates a provider talking to the metadata server at `metadata_base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, metadata_base_url: &str) -> Self {
        Self {
            http_client,
            token_url: format!("{}{TOKEN_PATH}", metadata_base_url.trim_end_matches('/')),
            cached_token: Mutex::new(None),
        }
    }

    async fn fetch_token(&self) -> AppResult<TokenResponse> {
        let response = self
            .http_client
            .get(self.token_url.as_str())
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to reach metadata server at '{}': {error}",
                    self.token_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(AppError::Internal(format!(
                "metadata server returned HTTP {}: {body}",
                status.as_u16()
            )));
        }

        response.json::<TokenResponse>().await.map_err(|error| {
            AppError::Internal(format!("failed to parse metadata token response: {error}"))
        })
    }
}

#[async_trait]
impl AccessTokenProvider for MetadataServerTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        let mut cached_token = self.cached_token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached_token
            .as_ref()
            .filter(|token| token.is_fresh_at(now))
        {
            return Ok(token.value.clone());
        }

        let response = self.fetch_token().await?;
        let lifetime = response.expires_in.min(MAX_TOKEN_LIFETIME_SECONDS);
        let lifetime = i64::try_from(lifetime).unwrap_or(REFRESH_MARGIN_SECONDS);
        debug!(expires_in = lifetime, "refreshed management API access token");

        *cached_token = Some(CachedToken {
            value: response.access_token.clone(),
            expires_at: now + Duration::seconds(lifetime),
        });
        Ok(response.access_token)
    }
}
