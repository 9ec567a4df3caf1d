pub mod detail;
pub mod search;
pub mod store;
pub mod summary;
pub mod view;
pub mod watchlist;

#[cfg(test)]
mod testing;

pub use detail::{CommitOutcome, DetailPhase, DetailSession, DetailState};
pub use search::{SearchSession, SearchState};
pub use store::{JsonFileStore, MemoryStore, PersistentStore, PersistentStoreExt, StoreError};
pub use summary::WatchSummary;
pub use view::{derive_view_state, ViewState};
pub use watchlist::WatchlistStore;
