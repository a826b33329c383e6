//! The sequential download-and-persist pipeline.
//!
//! A run moves through [`Stage`]s in a fixed order: credentials are collected,
//! the client logs in, activities are listed, and each activity's track is
//! fetched and written before the next one is started. The first error stops
//! the run. Pairs already on disk stay there; nothing is rolled back.

use std::fmt;
use std::path::Path;

use garmin_connect_client::GarminClient;
use thiserror::Error;

use crate::credentials::CredentialSource;
use crate::error::DownloadError;
use crate::persist::{OverwriteMode, PersistedPair, persist};

/// Where a pipeline run currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    CollectingCredentials,
    Authenticating,
    Listing,
    /// Zero-based position in the listed activities.
    ProcessingActivity(usize),
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => f.write_str("idle"),
            Stage::CollectingCredentials => f.write_str("collecting credentials"),
            Stage::Authenticating => f.write_str("authenticating"),
            Stage::Listing => f.write_str("listing activities"),
            Stage::ProcessingActivity(i) => write!(f, "processing activity #{}", i + 1),
            Stage::Done => f.write_str("done"),
            Stage::Failed => f.write_str("failed"),
        }
    }
}

/// A failed run: the stage that was active and the error that stopped it.
#[derive(Debug, Error)]
#[error("failed while {stage}: {error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    pub error: DownloadError,
}

/// Outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub requested_limit: u32,
    /// Pairs in the order they were written.
    pub activities: Vec<PersistedPair>,
}

#[derive(Debug)]
pub struct DownloadPipeline<C, S> {
    client: C,
    credentials: S,
    overwrite: OverwriteMode,
    stage: Stage,
}

impl<C, S> DownloadPipeline<C, S>
where
    C: GarminClient,
    S: CredentialSource,
{
    pub fn new(client: C, credentials: S) -> Self {
        Self {
            client,
            credentials,
            overwrite: OverwriteMode::default(),
            stage: Stage::Idle,
        }
    }

    pub fn with_overwrite(mut self, overwrite: OverwriteMode) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Download up to `limit` activities into `destination`.
    pub async fn run(
        &mut self,
        destination: &Path,
        limit: u32,
    ) -> Result<DownloadReport, PipelineFailure> {
        tracing::info!("downloading activities");
        tracing::debug!(destination = %destination.display(), limit, "starting run");

        self.advance(Stage::CollectingCredentials);
        let credentials = self.credentials.collect().map_err(|e| self.fail(e))?;

        self.advance(Stage::Authenticating);
        let login = self.client.authenticate(&credentials).await;
        drop(credentials);
        login.map_err(|e| self.fail(DownloadError::Auth(e)))?;
        tracing::debug!("authenticated");

        self.advance(Stage::Listing);
        let activities = self
            .client
            .list_activities(limit)
            .await
            .map_err(|e| self.fail(DownloadError::Remote(e)))?;
        tracing::info!(count = activities.len(), "got activities");

        let mut report = DownloadReport {
            requested_limit: limit,
            activities: Vec::with_capacity(activities.len()),
        };
        for (index, activity) in activities.iter().enumerate() {
            self.advance(Stage::ProcessingActivity(index));
            tracing::debug!(id = activity.id(), "processing activity");

            let track = self
                .client
                .fetch_track(activity.id())
                .await
                .map_err(|e| self.fail(DownloadError::Remote(e)))?;
            tracing::debug!(id = activity.id(), bytes = track.len(), "got track data");

            let pair = persist(activity, &track, destination, self.overwrite)
                .await
                .map_err(|e| self.fail(e))?;
            report.activities.push(pair);
        }

        self.advance(Stage::Done);
        tracing::info!(saved = report.activities.len(), "download complete");
        Ok(report)
    }

    fn advance(&mut self, next: Stage) {
        tracing::trace!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }

    fn fail(&mut self, error: DownloadError) -> PipelineFailure {
        let stage = self.stage;
        tracing::warn!(%stage, %error, "download aborted");
        self.stage = Stage::Failed;
        PipelineFailure { stage, error }
    }
}
