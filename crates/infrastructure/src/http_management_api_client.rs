//! REST client for the conversational agent management API.

use std::collections::HashSet;
use std::sync::Arc;

use agentguard_application::{
    AccessTokenProvider, AgentApi, FulfillmentApi, LegacyAgentApi, WebhookApi,
};
use agentguard_core::{AppError, AppResult, RemoteError, RemoteErrorCode};
use agentguard_domain::{Agent, ApiEndpoint, FieldMask, Fulfillment, LegacyAgent, Webhook};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

mod agents;
mod fulfillments;
mod webhooks;


const CX_API_VERSION: &str = "v3";
const LEGACY_API_VERSION: &str = "v2";
const LIST_PAGE_SIZE: &str = "100";
const MAX_LIST_PAGES: usize = 1000;

/// HTTP implementation of the management API ports.
///
/// The client performs no retries: failures surface to the caller so the
/// event delivery system can redeliver the whole event.
#[derive(Clone)]
pub struct HttpManagementApiClient {
    http_client: reqwest::Client,
    token_provider: Arc<dyn AccessTokenProvider>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl HttpManagementApiClient {
    /// Creates a client from a configured HTTP client and token source.
    #[must_use]
    pub fn new(http_client: reqwest::Client, token_provider: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            http_client,
            token_provider,
        }
    }

    fn resource_url(endpoint: &ApiEndpoint, version: &str, resource_path: &str) -> AppResult<Url> {
        let raw = format!(
            "{}/{version}/{}",
            endpoint.base_url(),
            resource_path.trim_matches('/')
        );
        Url::parse(raw.as_str()).map_err(|error| {
            AppError::Internal(format!("invalid management API URL '{raw}': {error}"))
        })
    }

    fn with_update_mask(mut url: Url, update_mask: &FieldMask) -> Url {
        url.query_pairs_mut()
            .append_pair("updateMask", update_mask.to_query_value().as_str());
        url
    }

    async fn get_json<T>(&self, operation: &str, url: Url) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        self.execute(operation, Method::GET, url, None::<&()>).await
    }

    async fn send_json<B, T>(&self, operation: &str, method: Method, url: Url, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.execute(operation, method, url, Some(body)).await
    }

    /// Fetches every page of a list call and concatenates the items.
    ///
    /// A repeated page token or more than `MAX_LIST_PAGES` pages is an
    /// error rather than an endless loop.
    async fn list_all<P, T>(
        &self,
        operation: &str,
        url: Url,
        into_parts: fn(P) -> (Vec<T>, String),
    ) -> AppResult<Vec<T>>
    where
        P: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        for _ in 0..MAX_LIST_PAGES {
            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("pageSize", LIST_PAGE_SIZE);
            if let Some(token) = page_token.as_deref() {
                page_url.query_pairs_mut().append_pair("pageToken", token);
            }

            let page = self.get_json::<P>(operation, page_url).await?;
            let (page_items, next_page_token) = into_parts(page);
            items.extend(page_items);

            if next_page_token.is_empty() {
                return Ok(items);
            }
            if !seen_tokens.insert(next_page_token.clone()) {
                return Err(AppError::Internal(format!(
                    "{operation} returned page token '{next_page_token}' twice"
                )));
            }
            page_token = Some(next_page_token);
        }

        Err(AppError::Internal(format!(
            "{operation} did not finish within {MAX_LIST_PAGES} pages"
        )))
    }

    async fn execute<B, T>(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let access_token = self.token_provider.access_token().await?;
        debug!(operation, method = %method, url = %url, "calling management API");

        let mut request = self
            .http_client
            .request(method, url)
            .bearer_auth(access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|error| {
            RemoteError::new(
                operation,
                RemoteErrorCode::Unavailable,
                format!("management API transport error: {error}"),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(remote_error_from_response(operation, status.as_u16(), body.as_str()).into());
        }

        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to parse {operation} response body: {error}"
            ))
        })
    }
}

fn remote_error_from_response(operation: &str, http_status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => RemoteError::new(
            operation,
            RemoteErrorCode::classify(http_status, envelope.error.status.as_deref()),
            envelope.error.message,
        ),
        Err(_) => RemoteError::new(
            operation,
            RemoteErrorCode::classify(http_status, None),
            format!("HTTP {http_status}: {body}"),
        ),
    }
    .with_http_status(http_status)
}
