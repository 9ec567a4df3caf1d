/// Failure of a catalog request.
///
/// The `Display` text is what the sessions show to the user, so the
/// transport-class variants share the same leading sentence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// The catalog answered but reported no match
    #[error("Movie not found")]
    NotFound,
    /// The catalog refused the request (bad key, quota)
    #[error("Something went wrong with fetching movies: {0}")]
    Rejected(String),
    #[error("Something went wrong with fetching movies (HTTP {status})")]
    Status { status: u16 },
    #[error("Something went wrong with fetching movies: {0}")]
    Transport(String),
    #[error("Something went wrong with fetching movies: invalid response ({0})")]
    Decode(String),
    /// Superseded or torn down; never shown to the user
    #[error("request cancelled")]
    Cancelled,
}

impl CatalogError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CatalogError::Cancelled)
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Status { status: status.as_u16() }
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}
