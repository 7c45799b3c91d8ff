//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_management_api_client;
mod in_memory_management_api;
mod metadata_server_token_provider;
mod static_access_token_provider;

pub use http_management_api_client::HttpManagementApiClient;
pub use in_memory_management_api::InMemoryManagementApi;
pub use metadata_server_token_provider::MetadataServerTokenProvider;
pub use static_access_token_provider::StaticAccessTokenProvider;
