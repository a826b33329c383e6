//! Download recent Garmin Connect activities to a local directory.
//!
//! - [`credentials`]: interactive login prompts
//! - [`persist`]: writing the `<id>.json` / `<id>.gpx.xml` pair
//! - [`pipeline`]: the sequential login, list, fetch and persist run
//! - [`cli`], [`config`], [`logging`]: the `gad` binary's surface

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod persist;
pub mod pipeline;

pub use credentials::{CredentialSource, StaticCredentials, StreamPrompt, TerminalPrompt};
pub use error::{DownloadError, DownloadResult};
pub use persist::{OverwriteMode, PersistedPair, persist};
pub use pipeline::{DownloadPipeline, DownloadReport, PipelineFailure, Stage};
