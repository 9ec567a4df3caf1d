//! Secrets kept out of `config.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable that takes precedence over the credentials file
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no catalog API key configured; set OMDB_API_KEY or run `popcorn config api-key`")]
    MissingApiKey,
}

/// On-disk layout of `credentials.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
struct CredentialsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    omdb_api_key: Option<String>,
}

pub struct CredentialStore {
    path: PathBuf,
    data: CredentialsFile,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: CredentialsFile::default(),
        }
    }

    /// Read the file if it exists; a missing file leaves the store empty
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        self.data = toml::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, content)?;
        restrict_permissions(&self.path)?;
        debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.data.omdb_api_key.as_deref()
    }

    pub fn set_api_key(&mut self, key: String) {
        self.data.omdb_api_key = Some(key);
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> Result<()> {
    Ok(())
}

/// Resolve the catalog credential at startup.
///
/// The environment wins over the credentials file; blank values count as unset.
pub fn resolve_api_key(store: &CredentialStore) -> Result<String, ConfigError> {
    resolve_api_key_from(std::env::var(API_KEY_ENV).ok(), store)
}

fn resolve_api_key_from(env_value: Option<String>, store: &CredentialStore) -> Result<String, ConfigError> {
    if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
        debug!("Using catalog API key from {}", API_KEY_ENV);
        return Ok(key.trim().to_string());
    }

    store
        .api_key()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingApiKey)
}
