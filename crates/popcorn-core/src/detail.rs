//! Detail view of a single selected title.
//!
//! Lifecycle: `Closed -> Loading -> Ready | Failed -> Closed`. Opening another
//! id supersedes the running fetch the same way a new query supersedes a
//! search. The rating revision counter belongs to one open/close cycle.

use popcorn_catalog::{start_detail, CatalogClient, CatalogError};
use popcorn_models::{MovieDetail, Rating, WatchedMovie};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::store::StoreError;
use crate::watchlist::WatchlistStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DetailPhase {
    #[default]
    Closed,
    Loading,
    Ready,
    /// The fetch failed; there is no retry, only close or open another id
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub selected_id: Option<String>,
    pub phase: DetailPhase,
    pub detail: Option<MovieDetail>,
    pub error: Option<String>,
    pub user_rating: Option<Rating>,
    pub rating_revision_count: u32,
    generation: u64,
}

impl DetailState {
    pub fn is_open(&self) -> bool {
        self.phase != DetailPhase::Closed
    }

    pub fn is_loading(&self) -> bool {
        self.phase == DetailPhase::Loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of [`DetailSession::commit_to_watchlist`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing to commit: no loaded detail or no rating yet
    NotReady,
    Added,
    /// The id was already on the list; the session still closed
    AlreadyWatched,
}

pub struct DetailSession {
    catalog: Arc<dyn CatalogClient>,
    state: Arc<watch::Sender<DetailState>>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl DetailSession {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        let (state, _) = watch::channel(DetailState::default());
        Self {
            catalog,
            state: Arc::new(state),
            in_flight: Mutex::new(None),
        }
    }

    /// Select `id` and start fetching its detail. Must run inside a Tokio runtime.
    pub fn open(&self, id: &str) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = in_flight.take() {
            previous.cancel();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = state.generation + 1;
            *state = DetailState {
                selected_id: Some(id.to_string()),
                phase: DetailPhase::Loading,
                generation,
                ..DetailState::default()
            };
        });

        debug!(id = %id, generation, "Detail request started");
        let handle = start_detail(&self.catalog, id);
        *in_flight = Some(handle.cancel_token());

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let outcome = handle.join().await;
            apply_outcome(&state, generation, outcome);
        });
    }

    /// Tear the session down, cancelling any running fetch
    pub fn close(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = in_flight.take() {
            previous.cancel();
        }

        self.state.send_if_modified(|state| {
            if !state.is_open() {
                return false;
            }
            debug!(id = ?state.selected_id, "Detail session closed");
            *state = DetailState {
                generation: state.generation + 1,
                ..DetailState::default()
            };
            true
        });
    }

    /// Selecting the id that is already open closes it instead
    pub fn toggle(&self, id: &str) {
        let already_open = self.state.borrow().selected_id.as_deref() == Some(id);
        if already_open {
            self.close();
        } else {
            self.open(id);
        }
    }

    /// Record the user's rating. Only a loaded detail can be rated.
    ///
    /// Every accepted call counts as one rating revision.
    pub fn set_user_rating(&self, rating: Rating) -> bool {
        self.state.send_if_modified(|state| {
            if state.phase != DetailPhase::Ready {
                return false;
            }
            state.user_rating = Some(rating);
            state.rating_revision_count += 1;
            debug!(
                id = ?state.selected_id,
                rating = rating.value(),
                revisions = state.rating_revision_count,
                "User rating set"
            );
            true
        })
    }

    /// Add the open title to `watchlist` with the current rating, then close.
    ///
    /// Without a loaded detail and a rating this is a no-op. On a storage
    /// error the session stays open so the action can be repeated.
    pub fn commit_to_watchlist(&self, watchlist: &mut WatchlistStore) -> Result<CommitOutcome, StoreError> {
        let movie = {
            let state = self.state.borrow();
            match (&state.phase, &state.detail, state.user_rating) {
                (DetailPhase::Ready, Some(detail), Some(rating)) => {
                    WatchedMovie::from_detail(detail, rating, state.rating_revision_count)
                }
                _ => return Ok(CommitOutcome::NotReady),
            }
        };

        let id = movie.id.clone();
        let added = watchlist.add(movie)?;
        self.close();

        if added {
            info!(id = %id, "Committed to watched list");
            Ok(CommitOutcome::Added)
        } else {
            Ok(CommitOutcome::AlreadyWatched)
        }
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Wait until the current fetch has finished (or the session closed)
    pub async fn settled(&self) -> DetailState {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|s| !s.is_loading()).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.state())
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.get_mut().ok().and_then(Option::take) {
            token.cancel();
        }
    }
}

fn apply_outcome(
    state: &watch::Sender<DetailState>,
    generation: u64,
    outcome: Result<MovieDetail, CatalogError>,
) {
    state.send_if_modified(|current| {
        if current.generation != generation || current.phase != DetailPhase::Loading {
            debug!(generation, current = current.generation, "Discarding superseded detail response");
            return false;
        }

        match outcome {
            Ok(detail) => {
                debug!(id = %detail.id, title = %detail.title, "Detail loaded");
                current.detail = Some(detail);
                current.phase = DetailPhase::Ready;
            }
            Err(CatalogError::Cancelled) => return false,
            Err(e) => {
                warn!(id = ?current.selected_id, "Detail fetch failed: {}", e);
                current.error = Some(e.to_string());
                current.phase = DetailPhase::Failed;
            }
        }
        true
    });
}
