//! Application configuration read from the environment.

use garmin_connect_client::config::Config as ClientConfig;

use crate::error::{DownloadError, DownloadResult};
use crate::persist::OverwriteMode;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub overwrite: OverwriteMode,
    /// Tracing filter directive, e.g. `info` or `garmin_activity_downloader=debug`.
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> DownloadResult<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading through `get`, so tests do
    /// not have to touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> DownloadResult<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let log_level = get("GAD_LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let overwrite = match get("GAD_OVERWRITE") {
            Some(raw) => raw.parse()?,
            None => OverwriteMode::default(),
        };
        let client = ClientConfig::from_env_with(&mut get)
            .map_err(|e| DownloadError::Config(e.to_string()))?;
        Ok(Self {
            client,
            overwrite,
            log_level,
        })
    }
}
