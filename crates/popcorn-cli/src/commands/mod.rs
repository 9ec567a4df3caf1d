pub mod browse;
pub mod config;
pub mod context;
pub mod prompts;
pub mod render;
pub mod search;
pub mod spinner;
pub mod watchlist;
