//! Query → results pipeline.
//!
//! Each call to [`SearchSession::search`] supersedes the previous one: the old
//! request is cancelled and the state's generation moves on, so a late reply
//! for an old query can never overwrite the results of the current one.

use popcorn_catalog::{start_search, CatalogClient, CatalogError};
use popcorn_config::SearchConfig;
use popcorn_models::SearchResultItem;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResultItem>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl SearchState {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct SearchSession {
    catalog: Arc<dyn CatalogClient>,
    min_query_length: usize,
    state: Arc<watch::Sender<SearchState>>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl SearchSession {
    pub fn new(catalog: Arc<dyn CatalogClient>, min_query_length: usize) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            catalog,
            min_query_length,
            state: Arc::new(state),
            in_flight: Mutex::new(None),
        }
    }

    pub fn with_config(catalog: Arc<dyn CatalogClient>, config: &SearchConfig) -> Self {
        Self::new(catalog, config.min_query_length)
    }

    /// Make `query` the current query.
    ///
    /// Short queries clear the results without touching the network. Must be
    /// called from within a Tokio runtime.
    pub fn search(&self, query: &str) {
        // Held for the whole call so two searches cannot interleave
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());

        if let Some(previous) = in_flight.take() {
            previous.cancel();
        }

        let too_short = query.chars().count() < self.min_query_length;
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.query = query.to_string();
            state.error = None;
            if too_short {
                state.results.clear();
                state.loading = false;
            } else {
                state.loading = true;
            }
        });

        if too_short {
            debug!(query = %query, generation, "Query below minimum length, results cleared");
            return;
        }

        debug!(query = %query, generation, "Search request started");
        let handle = start_search(&self.catalog, query);
        *in_flight = Some(handle.cancel_token());

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let outcome = handle.join().await;
            apply_outcome(&state, generation, outcome);
        });
    }

    /// Back to the empty "no search" state
    pub fn clear(&self) {
        self.search("");
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Wait until the current query is no longer loading and return the state
    pub async fn settled(&self) -> SearchState {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|s| !s.loading).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.state())
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.get_mut().ok().and_then(Option::take) {
            token.cancel();
        }
    }
}

/// Apply a finished request if it still belongs to the current generation.
fn apply_outcome(
    state: &watch::Sender<SearchState>,
    generation: u64,
    outcome: Result<Vec<SearchResultItem>, CatalogError>,
) {
    state.send_if_modified(|current| {
        if current.generation != generation {
            debug!(generation, current = current.generation, "Discarding superseded search response");
            return false;
        }

        match outcome {
            Ok(items) => {
                debug!(query = %current.query, count = items.len(), "Search results applied");
                current.results = items;
                current.error = None;
            }
            Err(CatalogError::Cancelled) => return false,
            Err(CatalogError::NotFound) => {
                current.results.clear();
                current.error = Some(CatalogError::NotFound.to_string());
            }
            Err(e) => {
                warn!(query = %current.query, "Search failed: {}", e);
                current.error = Some(e.to_string());
            }
        }
        current.loading = false;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{drain_tasks, search_item, GatedCatalog};

    fn session(catalog: &Arc<GatedCatalog>) -> SearchSession {
        SearchSession::new(catalog.clone(), 3)
    }

    #[tokio::test]
    async fn test_short_query_clears_without_network() {
        let catalog = GatedCatalog::new();
        let session = session(&catalog);

        for query in ["", "m", "ma"] {
            session.search(query);
            let state = session.state();
            assert!(state.results.is_empty());
            assert!(!state.loading);
            assert_eq!(state.error, None);
        }
        drain_tasks().await;
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_results_applied_on_success() {
        let catalog = GatedCatalog::new();
        let reply = catalog.gate_search("matrix");
        let session = session(&catalog);

        session.search("matrix");
        assert!(session.state().loading);

        reply.send(Ok(vec![search_item("tt0133093", "The Matrix")])).unwrap();
        let state = session.settled().await;
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.results.len(), 1);
        assert_eq!(catalog.calls(), vec!["search:matrix".to_string()]);
    }

    #[tokio::test]
    async fn test_not_found_clears_results_and_sets_message() {
        let catalog = GatedCatalog::new();
        let session = session(&catalog);

        catalog.gate_search("matrix").send(Ok(vec![search_item("tt0133093", "The Matrix")])).unwrap();
        session.search("matrix");
        session.settled().await;

        catalog.gate_search("zzzzzz").send(Err(CatalogError::NotFound)).unwrap();
        session.search("zzzzzz");
        let state = session.settled().await;
        assert!(state.results.is_empty());
        assert_eq!(state.error.as_deref(), Some("Movie not found"));
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_results() {
        let catalog = GatedCatalog::new();
        let session = session(&catalog);

        catalog.gate_search("matrix").send(Ok(vec![search_item("tt0133093", "The Matrix")])).unwrap();
        session.search("matrix");
        session.settled().await;

        catalog
            .gate_search("matrix 2")
            .send(Err(CatalogError::Status { status: 500 }))
            .unwrap();
        session.search("matrix 2");
        let state = session.settled().await;
        assert!(!state.loading);
        assert_eq!(state.results.len(), 1);
        assert!(state
            .error
            .unwrap()
            .starts_with("Something went wrong with fetching movies"));
    }

    #[tokio::test]
    async fn test_last_query_wins_when_stale_reply_arrives_late() {
        let catalog = GatedCatalog::new();
        let first = catalog.gate_search("matrix");
        let second = catalog.gate_search("matrix reloaded");
        let session = session(&catalog);

        session.search("matrix");
        drain_tasks().await;
        session.search("matrix reloaded");
        drain_tasks().await;
        assert_eq!(
            catalog.calls(),
            vec!["search:matrix".to_string(), "search:matrix reloaded".to_string()]
        );
        // The first request reached the catalog and was then cancelled
        assert!(first.is_closed());

        second.send(Ok(vec![search_item("tt0234215", "The Matrix Reloaded")])).unwrap();
        let state = session.settled().await;
        assert_eq!(state.results[0].id, "tt0234215");

        let _ = first.send(Ok(vec![search_item("tt0133093", "The Matrix")]));
        drain_tasks().await;

        let state = session.state();
        assert_eq!(state.query, "matrix reloaded");
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].id, "tt0234215");
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_stale_reply_arriving_first_is_ignored() {
        let catalog = GatedCatalog::new();
        let first = catalog.gate_search("matrix");
        let second = catalog.gate_search("matrix reloaded");
        let session = session(&catalog);

        session.search("matrix");
        drain_tasks().await;
        session.search("matrix reloaded");
        drain_tasks().await;
        assert_eq!(catalog.calls().len(), 2);

        let _ = first.send(Err(CatalogError::Transport("connection reset".to_string())));
        drain_tasks().await;
        let state = session.state();
        assert!(state.loading);
        assert!(state.results.is_empty());
        assert_eq!(state.error, None);

        second.send(Ok(vec![search_item("tt0234215", "The Matrix Reloaded")])).unwrap();
        let state = session.settled().await;
        assert_eq!(state.results[0].id, "tt0234215");
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_short_query_cancels_in_flight_request() {
        let catalog = GatedCatalog::new();
        let reply = catalog.gate_search("matrix");
        let session = session(&catalog);

        session.search("matrix");
        drain_tasks().await;
        assert_eq!(catalog.calls(), vec!["search:matrix".to_string()]);

        session.search("ma");
        drain_tasks().await;
        assert!(reply.is_closed());
        let _ = reply.send(Ok(vec![search_item("tt0133093", "The Matrix")]));
        drain_tasks().await;

        let state = session.state();
        assert!(state.results.is_empty());
        assert!(!state.loading);
    }

    #[test]
    fn test_outcome_for_old_generation_is_discarded() {
        let (tx, _rx) = watch::channel(SearchState {
            query: "matrix reloaded".to_string(),
            loading: true,
            generation: 2,
            ..SearchState::default()
        });

        apply_outcome(&tx, 1, Ok(vec![search_item("tt0133093", "The Matrix")]));
        assert!(tx.borrow().results.is_empty());
        assert!(tx.borrow().loading);

        apply_outcome(&tx, 2, Err(CatalogError::Cancelled));
        assert!(tx.borrow().loading);
    }

    #[tokio::test]
    async fn test_same_query_reissued_uses_latest_request() {
        let catalog = GatedCatalog::new();
        let session = session(&catalog);

        let old = catalog.gate_search("matrix");
        session.search("matrix");
        drain_tasks().await;
        session.search("matri");
        // Scripted only after the first request consumed its own reply slot
        let current = catalog.gate_search("matrix");
        session.search("matrix");
        drain_tasks().await;
        assert_eq!(
            catalog.calls(),
            vec!["search:matrix".to_string(), "search:matrix".to_string()]
        );
        assert!(old.is_closed());

        let _ = old.send(Ok(vec![search_item("tt-old", "Old")]));
        current.send(Ok(vec![search_item("tt0133093", "The Matrix")])).unwrap();
        let state = session.settled().await;
        assert_eq!(state.results[0].id, "tt0133093");
        assert_eq!(state.generation(), 3);
    }
}
