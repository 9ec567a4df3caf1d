use popcorn_models::{Rating, WatchedMovie};
use serde::Serialize;
use crate::detail::{DetailPhase, DetailState};

/// What the detail surface should show, derived from the session and the
/// watched list together. Recompute it whenever either changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub is_watched: bool,
    /// Rating stored on the watched list; shown instead of the rating control
    pub watched_user_rating: Option<Rating>,
    /// Whether the rating control is offered
    pub can_rate: bool,
    /// Whether "add to list" is enabled
    pub can_commit: bool,
}

pub fn derive_view_state(detail: &DetailState, watched: &[WatchedMovie]) -> ViewState {
    let entry = detail
        .selected_id
        .as_deref()
        .and_then(|id| watched.iter().find(|m| m.id == id));

    let is_watched = entry.is_some();
    let can_rate = detail.phase == DetailPhase::Ready && detail.detail.is_some() && !is_watched;

    ViewState {
        is_watched,
        watched_user_rating: entry.map(|m| m.user_rating),
        can_rate,
        can_commit: can_rate && detail.user_rating.is_some(),
    }
}
