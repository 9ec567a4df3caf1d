use popcorn_models::WatchedMovie;
use serde::Serialize;

/// Aggregate statistics over the watched list.
///
/// Averages over an empty list are `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct WatchSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime_minutes: f64,
}

impl WatchSummary {
    pub fn compute(watched: &[WatchedMovie]) -> Self {
        Self {
            count: watched.len(),
            avg_imdb_rating: mean(watched.iter().map(|m| m.imdb_rating)),
            avg_user_rating: mean(watched.iter().map(|m| f64::from(m.user_rating.value()))),
            avg_runtime_minutes: mean(watched.iter().map(|m| f64::from(m.runtime_minutes))),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
