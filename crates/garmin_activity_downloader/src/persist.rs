//! Writing one activity's metadata and track to the destination directory.
//!
//! Each activity produces exactly two files keyed by its id:
//! `<id>.json` holding the record as compact JSON, and `<id>.gpx.xml` holding
//! the track exactly as downloaded. Existing files for the same id are
//! replaced, never merged or appended to.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use garmin_connect_client::ActivityRecord;

use crate::error::{DownloadError, DownloadResult};

/// How an existing output file is replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverwriteMode {
    /// Remove the old file, then write the new one in place. A crash between
    /// the two steps leaves no file behind.
    DeleteThenWrite,
    /// Write a sibling `.part` file and rename it over the target.
    #[default]
    AtomicReplace,
}

impl FromStr for OverwriteMode {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" | "replace" => Ok(OverwriteMode::AtomicReplace),
            "delete" | "delete-then-write" => Ok(OverwriteMode::DeleteThenWrite),
            other => Err(DownloadError::Config(format!(
                "unknown overwrite mode {other:?} (expected \"atomic\" or \"delete\")"
            ))),
        }
    }
}

/// The two files written for one activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedPair {
    pub id: String,
    pub metadata_path: PathBuf,
    pub track_path: PathBuf,
}

pub fn metadata_file_name(id: &str) -> String {
    format!("{id}.json")
}

pub fn track_file_name(id: &str) -> String {
    format!("{id}.gpx.xml")
}

/// Persist `activity` and its `track` into `destination`.
///
/// The destination is checked on every call and is never created here; a
/// missing directory yields [`DownloadError::PathNotFound`] before anything is
/// written.
pub async fn persist(
    activity: &ActivityRecord,
    track: &str,
    destination: &Path,
    mode: OverwriteMode,
) -> DownloadResult<PersistedPair> {
    let exists = tokio::fs::try_exists(destination)
        .await
        .map_err(DownloadError::write(destination))?;
    if !exists {
        return Err(DownloadError::PathNotFound(destination.to_path_buf()));
    }

    let id = activity.id();
    check_id(id)?;

    let metadata_path = destination.join(metadata_file_name(id));
    let track_path = destination.join(track_file_name(id));

    let metadata = activity.to_json_string()?;
    write_replacing(&metadata_path, metadata.as_bytes(), mode).await?;
    write_replacing(&track_path, track.as_bytes(), mode).await?;

    tracing::debug!(id, dir = %destination.display(), "saved activity");
    Ok(PersistedPair {
        id: id.to_string(),
        metadata_path,
        track_path,
    })
}

// Ids become file names, so anything that could escape the directory is refused.
fn check_id(id: &str) -> DownloadResult<()> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if bad {
        return Err(DownloadError::InvalidActivityId(id.to_string()));
    }
    Ok(())
}

async fn write_replacing(path: &Path, contents: &[u8], mode: OverwriteMode) -> DownloadResult<()> {
    match mode {
        OverwriteMode::DeleteThenWrite => {
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::trace!(path = %path.display(), "removed previous file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(DownloadError::write(path)(e)),
            }
            tokio::fs::write(path, contents)
                .await
                .map_err(DownloadError::write(path))
        }
        OverwriteMode::AtomicReplace => {
            let staging = staging_path(path);
            tokio::fs::write(&staging, contents)
                .await
                .map_err(DownloadError::write(&staging))?;
            if let Err(e) = tokio::fs::rename(&staging, path).await {
                let _ = tokio::fs::remove_file(&staging).await;
                return Err(DownloadError::write(path)(e));
            }
            Ok(())
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}
