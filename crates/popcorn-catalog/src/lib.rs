pub mod error;
pub mod factory;
pub mod handle;
pub mod omdb;
pub mod traits;

pub use error::CatalogError;
pub use factory::create_catalog;
pub use handle::RequestHandle;
pub use omdb::OmdbClient;
pub use traits::{start_detail, start_search, CatalogClient};
