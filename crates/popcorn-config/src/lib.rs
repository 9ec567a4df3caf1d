pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{is_valid_storage_key, CatalogConfig, Config, LoggingConfig, SearchConfig, StorageConfig, DEFAULT_CATALOG_URL};
pub use credentials::{resolve_api_key, ConfigError, CredentialStore, API_KEY_ENV};
pub use paths::{PathManager, BASE_PATH_ENV};
