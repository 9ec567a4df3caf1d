//! Builds the configured catalog client.

use popcorn_config::{Config, CredentialStore};
use std::sync::Arc;
use crate::omdb::OmdbClient;
use crate::traits::CatalogClient;

/// Resolve the API key and construct the catalog client for `config`
pub fn create_catalog(config: &Config, credentials: &CredentialStore) -> anyhow::Result<Arc<dyn CatalogClient>> {
    let api_key = popcorn_config::resolve_api_key(credentials)?;
    let client = OmdbClient::from_config(&config.catalog, api_key)?;
    Ok(Arc::new(client))
}
