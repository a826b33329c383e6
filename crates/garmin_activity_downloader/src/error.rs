//! Error types for the download pipeline.

use std::path::PathBuf;

use garmin_connect_client::GarminError;
use thiserror::Error;

/// Everything that can stop a download run.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to read credentials: {0}")]
    Input(#[source] std::io::Error),

    #[error("authentication failed: {0}")]
    Auth(#[source] GarminError),

    #[error("remote call failed: {0}")]
    Remote(#[source] GarminError),

    #[error("destination {} does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("activity id {0:?} cannot be used as a file name")]
    InvalidActivityId(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DownloadError {
    pub(crate) fn write(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| DownloadError::Write { path, source }
    }
}

/// Result type alias for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;
