use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultItem};
use std::sync::Arc;
use crate::error::CatalogError;
use crate::handle::RequestHandle;

/// Request/response contract of the remote movie catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    fn catalog_name(&self) -> &str;

    /// Title search. Zero matches is `CatalogError::NotFound`, not an empty list.
    async fn search_by_title(&self, query: &str) -> Result<Vec<SearchResultItem>, CatalogError>;

    async fn get_by_id(&self, id: &str) -> Result<MovieDetail, CatalogError>;
}

/// Start a title search in the background and return its cancellable handle
pub fn start_search(
    client: &Arc<dyn CatalogClient>,
    query: &str,
) -> RequestHandle<Vec<SearchResultItem>> {
    let client = Arc::clone(client);
    let query = query.to_string();
    RequestHandle::spawn(async move { client.search_by_title(&query).await })
}

/// Start a detail fetch in the background and return its cancellable handle
pub fn start_detail(client: &Arc<dyn CatalogClient>, id: &str) -> RequestHandle<MovieDetail> {
    let client = Arc::clone(client);
    let id = id.to_string();
    RequestHandle::spawn(async move { client.get_by_id(&id).await })
}
