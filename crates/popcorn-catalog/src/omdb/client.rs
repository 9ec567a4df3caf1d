use async_trait::async_trait;
use popcorn_config::CatalogConfig;
use popcorn_models::{MovieDetail, SearchResultItem};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use crate::error::CatalogError;
use crate::omdb::api;
use crate::traits::CatalogClient;

/// Client for the OMDb HTTP API (or anything speaking the same protocol).
#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Transport(format!("failed to build HTTP client: {}", e)))?;

        info!("OMDb catalog at {}", base_url);
        Ok(Self {
            client: Arc::new(client),
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &CatalogConfig, api_key: String) -> Result<Self, CatalogError> {
        Self::new(
            config.base_url.clone(),
            api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl CatalogClient for OmdbClient {
    fn catalog_name(&self) -> &str {
        "omdb"
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<SearchResultItem>, CatalogError> {
        api::search(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn get_by_id(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        api::get_by_id(&self.client, &self.base_url, &self.api_key, id).await
    }
}
