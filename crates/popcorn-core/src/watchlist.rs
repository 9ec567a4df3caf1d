use popcorn_models::WatchedMovie;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::store::{PersistentStore, PersistentStoreExt, StoreError};
use crate::summary::WatchSummary;

/// In-memory projection of the persisted watched list.
///
/// Every mutation is written through before it returns. If the write fails
/// the in-memory change is undone, so memory and storage never disagree.
pub struct WatchlistStore {
    store: Arc<dyn PersistentStore>,
    key: String,
    movies: Vec<WatchedMovie>,
}

impl WatchlistStore {
    /// Read the list once from `store`; a missing or unreadable entry starts empty.
    pub fn open(store: Arc<dyn PersistentStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let loaded: Vec<WatchedMovie> = store.load(&key, Vec::new());

        // Older data may carry duplicate ids; keep the first occurrence
        let mut seen = HashSet::new();
        let total = loaded.len();
        let movies: Vec<WatchedMovie> = loaded
            .into_iter()
            .filter(|m| seen.insert(m.id.clone()))
            .collect();
        if movies.len() != total {
            warn!(
                "Dropped {} duplicate watched entries while loading '{}'",
                total - movies.len(),
                key
            );
        }

        info!("Loaded {} watched movies from '{}'", movies.len(), key);
        Self { store, key, movies }
    }

    /// Insert `movie` unless its id is already present.
    ///
    /// Returns `Ok(false)` for the duplicate no-op.
    pub fn add(&mut self, movie: WatchedMovie) -> Result<bool, StoreError> {
        if self.contains(&movie.id) {
            debug!(id = %movie.id, "Already on the watched list, skipping add");
            return Ok(false);
        }

        let id = movie.id.clone();
        self.movies.push(movie);
        if let Err(e) = self.persist() {
            self.movies.pop();
            return Err(e);
        }

        info!(id = %id, "Added to watched list");
        Ok(true)
    }

    /// Delete the entry with `id`; `Ok(false)` when there was none.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(index) = self.movies.iter().position(|m| m.id == id) else {
            debug!(id = %id, "Not on the watched list, nothing to remove");
            return Ok(false);
        };

        let removed = self.movies.remove(index);
        if let Err(e) = self.persist() {
            self.movies.insert(index, removed);
            return Err(e);
        }

        info!(id = %id, "Removed from watched list");
        Ok(true)
    }

    /// Entries in insertion order
    pub fn list(&self) -> &[WatchedMovie] {
        &self.movies
    }

    pub fn contains(&self, id: &str) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WatchedMovie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn summary(&self) -> WatchSummary {
        WatchSummary::compute(&self.movies)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.save(&self.key, &self.movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use crate::testing::watched_movie;

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl PersistentStore for ReadOnlyStore {
        fn load_raw(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn save_raw(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    fn open_memory() -> (MemoryStore, WatchlistStore) {
        let backing = MemoryStore::new();
        let watchlist = WatchlistStore::open(Arc::new(backing.clone()), "watched");
        (backing, watchlist)
    }

    #[test]
    fn test_add_is_idempotent_on_id() {
        let (_, mut watchlist) = open_memory();
        assert!(watchlist.add(watched_movie("tt0133093", 8.7, 9, 136)).unwrap());
        assert!(!watchlist.add(watched_movie("tt0133093", 8.7, 3, 136)).unwrap());

        assert_eq!(watchlist.len(), 1);
        assert_eq!(watchlist.get("tt0133093").unwrap().user_rating.value(), 9);
    }

    #[test]
    fn test_add_with_mixed_ids_never_duplicates() {
        let (_, mut watchlist) = open_memory();
        watchlist.add(watched_movie("tt1", 7.0, 7, 100)).unwrap();
        watchlist.add(watched_movie("tt2", 7.0, 7, 100)).unwrap();
        watchlist.add(watched_movie("tt1", 7.0, 7, 100)).unwrap();

        let ids: Vec<&str> = watchlist.list().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["tt1", "tt2"]);
    }

    #[test]
    fn test_remove() {
        let (_, mut watchlist) = open_memory();
        watchlist.add(watched_movie("tt1", 7.0, 7, 100)).unwrap();
        watchlist.add(watched_movie("tt2", 7.0, 7, 100)).unwrap();

        assert!(watchlist.remove("tt1").unwrap());
        assert!(!watchlist.contains("tt1"));
        assert!(!watchlist.remove("tt-missing").unwrap());
        assert_eq!(watchlist.len(), 1);
    }

    #[test]
    fn test_write_through_round_trip() {
        let (backing, mut watchlist) = open_memory();
        watchlist.add(watched_movie("tt1", 8.0, 7, 120)).unwrap();
        watchlist.add(watched_movie("tt2", 6.0, 9, 100)).unwrap();
        watchlist.add(watched_movie("tt3", 5.0, 2, 90)).unwrap();
        watchlist.remove("tt2").unwrap();

        let reopened = WatchlistStore::open(Arc::new(backing), "watched");
        assert_eq!(reopened.list(), watchlist.list());
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path()));
        let mut watchlist = WatchlistStore::open(store.clone(), "watched");
        watchlist.add(watched_movie("tt0133093", 8.7, 9, 136)).unwrap();

        let reopened = WatchlistStore::open(store, "watched");
        assert_eq!(reopened.list(), watchlist.list());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let mut watchlist = WatchlistStore::open(Arc::new(ReadOnlyStore), "watched");
        assert!(watchlist.add(watched_movie("tt1", 7.0, 7, 100)).is_err());
        assert!(watchlist.is_empty());
    }

    #[test]
    fn test_duplicates_in_storage_are_dropped_on_open() {
        let backing = MemoryStore::new();
        let duplicated = vec![
            watched_movie("tt1", 7.0, 7, 100),
            watched_movie("tt2", 6.0, 6, 90),
            watched_movie("tt1", 7.0, 3, 100),
        ];
        backing.save("watched", &duplicated).unwrap();

        let watchlist = WatchlistStore::open(Arc::new(backing), "watched");
        assert_eq!(watchlist.len(), 2);
        assert_eq!(watchlist.get("tt1").unwrap().user_rating.value(), 7);
    }

    #[test]
    fn test_summary_follows_mutations() {
        let (_, mut watchlist) = open_memory();
        watchlist.add(watched_movie("tt1", 8.0, 7, 120)).unwrap();
        watchlist.add(watched_movie("tt2", 6.0, 9, 100)).unwrap();
        assert_eq!(watchlist.summary().avg_runtime_minutes, 110.0);

        watchlist.remove("tt2").unwrap();
        assert_eq!(watchlist.summary().count, 1);
        assert_eq!(watchlist.summary().avg_user_rating, 7.0);
    }
}
