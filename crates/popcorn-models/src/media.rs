use serde::{Deserialize, Serialize};

/// One row of a catalog title search.
///
/// Produced only from catalog responses and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultItem {
    pub id: String, // IMDb id, e.g. "tt0133093"
    pub title: String,
    pub year: String, // Free-form, series use ranges like "2008–2013"
    pub poster_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>, // "movie", "series", "episode"
}

/// Full record for a single title, as shown in the detail view.
///
/// Numeric fields are already normalized: values the catalog reports as
/// `"N/A"` arrive here as `0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub runtime_minutes: u32,
    pub imdb_rating: f64,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}
