use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use popcorn_catalog::{create_catalog, CatalogClient};
use popcorn_config::{Config, CredentialStore, PathManager};
use popcorn_core::{JsonFileStore, WatchlistStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs, loaded once per invocation
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

        debug!(config = %config_file.display(), "Loaded configuration");
        Ok(Self { paths, config, credentials })
    }

    /// Directory the watched list lives in; `[storage] data_dir` wins over the default
    pub fn data_dir(&self) -> PathBuf {
        self.config
            .storage
            .data_dir
            .clone()
            .unwrap_or_else(|| self.paths.data_dir())
    }

    pub fn catalog(&self) -> Result<Arc<dyn CatalogClient>> {
        create_catalog(&self.config, &self.credentials).map_err(|e| eyre!("{}", e))
    }

    pub fn watchlist(&self) -> Result<WatchlistStore> {
        let dir = self.data_dir();
        std::fs::create_dir_all(&dir)
            .wrap_err_with(|| format!("Failed to create data directory {}", dir.display()))?;
        let store = Arc::new(JsonFileStore::new(dir));
        Ok(WatchlistStore::open(store, self.config.storage.watched_key.clone()))
    }
}
