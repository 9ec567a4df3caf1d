pub mod media;
pub mod rating;
pub mod watched;

pub use media::{MovieDetail, SearchResultItem};
pub use rating::{Rating, RatingError};
pub use watched::WatchedMovie;
