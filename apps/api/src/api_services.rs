use std::sync::Arc;

use agentguard_application::{AccessTokenProvider, ManagementApiPorts, PolicyEnforcementService};
use agentguard_core::AppError;
use agentguard_infrastructure::{
    HttpManagementApiClient, MetadataServerTokenProvider, StaticAccessTokenProvider,
};
use tracing::info;

use crate::api_config::{ApiConfig, TokenSourceConfig};
use crate::state::AppState;

pub fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let token_provider = build_token_provider(&config.token_source, http_client.clone());
    let management_api = Arc::new(HttpManagementApiClient::new(http_client, token_provider));

    let policy_service = PolicyEnforcementService::new(
        ManagementApiPorts::from_client(management_api),
        config.endpoint_resolver.clone(),
        config.logging_policy,
    );

    Ok(AppState { policy_service })
}

fn build_token_provider(
    token_source: &TokenSourceConfig,
    http_client: reqwest::Client,
) -> Arc<dyn AccessTokenProvider> {
    match token_source {
        TokenSourceConfig::Static(token) => {
            info!("using static management API access token");
            Arc::new(StaticAccessTokenProvider::new(token.as_str()))
        }
        TokenSourceConfig::MetadataServer { base_url } => {
            info!(metadata_server = %base_url, "using metadata server access tokens");
            Arc::new(MetadataServerTokenProvider::new(http_client, base_url))
        }
    }
}
