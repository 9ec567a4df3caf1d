use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::MovieDetail;
use crate::rating::Rating;

/// An entry of the user's watched list.
///
/// `id` is the natural key: a list never holds two entries with the same id.
/// Entries are replaced, never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedMovie {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub imdb_rating: f64,
    pub runtime_minutes: u32,
    pub user_rating: Rating,
    /// How many times the rating was adjusted before the movie was added
    pub rating_revision_count: u32,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl WatchedMovie {
    pub fn from_detail(detail: &MovieDetail, user_rating: Rating, rating_revision_count: u32) -> Self {
        Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            imdb_rating: detail.imdb_rating,
            runtime_minutes: detail.runtime_minutes,
            user_rating,
            rating_revision_count,
            added_at: Utc::now(),
        }
    }
}
