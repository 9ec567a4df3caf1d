//! Where popcorn keeps its files.
//!
//! Everything hangs off one root directory: `config.toml` and
//! `credentials.toml` at the top, the watched list under `data/` and rolled
//! log files under `logs/`.

use anyhow::{anyhow, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Overrides the root directory, e.g. a mounted volume in a container
pub const BASE_PATH_ENV: &str = "POPCORN_BASE_PATH";

const LOG_FILE_NAME: &str = "popcorn.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathManager {
    root: PathBuf,
}

impl PathManager {
    pub fn with_base(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$POPCORN_BASE_PATH` if set, otherwise `<platform config dir>/popcorn`
    pub fn from_env() -> Result<Self> {
        resolve_root(std::env::var_os(BASE_PATH_ENV), dirs::config_dir()).map(Self::with_base)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.root.join("credentials.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Where `[logging] file` points. Relative paths land in the log directory.
    pub fn log_file(&self, configured: Option<&Path>) -> PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.log_dir().join(path),
            None => self.log_dir().join(LOG_FILE_NAME),
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [self.root.clone(), self.data_dir(), self.log_dir()] {
            std::fs::create_dir_all(&dir)
                .map_err(|e| anyhow!("creating {}: {}", dir.display(), e))?;
        }
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // No platform config dir (minimal containers): fall back to the working directory
        Self::from_env().unwrap_or_else(|_| Self::with_base(".popcorn"))
    }
}

fn resolve_root(env_value: Option<OsString>, platform_config: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    platform_config
        .map(|dir| dir.join("popcorn"))
        .ok_or_else(|| anyhow!("Could not determine config directory; set {}", BASE_PATH_ENV))
}
