//! Fixtures shared by the unit tests of this crate.

use async_trait::async_trait;
use popcorn_catalog::{CatalogClient, CatalogError};
use popcorn_models::{MovieDetail, Rating, SearchResultItem, WatchedMovie};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type SearchReply = Result<Vec<SearchResultItem>, CatalogError>;
type DetailReply = Result<MovieDetail, CatalogError>;

pub fn search_item(id: &str, title: &str) -> SearchResultItem {
    SearchResultItem {
        id: id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        poster_url: format!("https://posters.example/{}.jpg", id),
        kind: Some("movie".to_string()),
    }
}

pub fn movie_detail(id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        id: id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        poster_url: format!("https://posters.example/{}.jpg", id),
        runtime_minutes: 136,
        imdb_rating: 8.7,
        plot: "A computer hacker learns about the true nature of reality.".to_string(),
        released: "31 Mar 1999".to_string(),
        actors: "Keanu Reeves, Laurence Fishburne".to_string(),
        director: "Lana Wachowski, Lilly Wachowski".to_string(),
        genre: "Action, Sci-Fi".to_string(),
    }
}

pub fn watched_movie(id: &str, imdb_rating: f64, user_rating: u8, runtime_minutes: u32) -> WatchedMovie {
    let mut detail = movie_detail(id, id);
    detail.imdb_rating = imdb_rating;
    detail.runtime_minutes = runtime_minutes;
    WatchedMovie::from_detail(&detail, Rating::new(user_rating).unwrap(), 1)
}

/// Catalog whose replies are released by the test.
///
/// Each expected request gets a gate; the request blocks until the test sends
/// a reply through the returned sender. Requests without a gate fail with a
/// transport error. Every call is recorded, in order.
#[derive(Default)]
pub struct GatedCatalog {
    calls: Mutex<Vec<String>>,
    searches: Mutex<HashMap<String, oneshot::Receiver<SearchReply>>>,
    details: Mutex<HashMap<String, oneshot::Receiver<DetailReply>>>,
}

impl GatedCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gate_search(&self, query: &str) -> oneshot::Sender<SearchReply> {
        let (tx, rx) = oneshot::channel();
        self.searches.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    pub fn gate_detail(&self, id: &str) -> oneshot::Sender<DetailReply> {
        let (tx, rx) = oneshot::channel();
        self.details.lock().unwrap().insert(id.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogClient for GatedCatalog {
    fn catalog_name(&self) -> &str {
        "gated"
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<SearchResultItem>, CatalogError> {
        self.calls.lock().unwrap().push(format!("search:{}", query));
        let gate = self.searches.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(CatalogError::Cancelled)),
            None => Err(CatalogError::Transport(format!("no reply scripted for '{}'", query))),
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        self.calls.lock().unwrap().push(format!("detail:{}", id));
        let gate = self.details.lock().unwrap().remove(id);
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(CatalogError::Cancelled)),
            None => Err(CatalogError::Transport(format!("no reply scripted for '{}'", id))),
        }
    }
}

/// Let spawned tasks run to quiescence on the test runtime
pub async fn drain_tasks() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
