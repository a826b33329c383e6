//! In-memory `GarminClient` used by tests and offline runs.
//!
//! Every call is recorded in order so callers can assert on what was requested
//! and when.

use crate::{ActivityRecord, Credentials, GarminClient, GarminError, SessionToken, TrackData};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One recorded call against [`FakeGarminClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Authenticate { identifier: String },
    ListActivities { limit: u32 },
    FetchTrack { activity_id: String },
}

#[derive(Debug, Default)]
pub struct FakeGarminClient {
    activities: Vec<(ActivityRecord, TrackData)>,
    reject_login: bool,
    fail_listing: bool,
    failing_tracks: HashSet<String>,
    session: Mutex<Option<SessionToken>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGarminClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an activity; listing returns activities in insertion order.
    pub fn with_activity(mut self, record: ActivityRecord, track: impl Into<TrackData>) -> Self {
        self.activities.push((record, track.into()));
        self
    }

    pub fn rejecting_login(mut self) -> Self {
        self.reject_login = true;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_track(mut self, activity_id: impl Into<String>) -> Self {
        self.failing_tracks.insert(activity_id.into());
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    fn require_session(&self) -> Result<(), GarminError> {
        lock(&self.session)
            .as_ref()
            .map(|_| ())
            .ok_or(GarminError::NotAuthenticated)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl GarminClient for FakeGarminClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, GarminError> {
        self.record(Call::Authenticate {
            identifier: credentials.identifier.clone(),
        });
        if self.reject_login {
            return Err(GarminError::Auth("invalid credentials".into()));
        }
        let token = SessionToken::new("ST-fake-session");
        *lock(&self.session) = Some(token.clone());
        Ok(token)
    }

    async fn list_activities(&self, limit: u32) -> Result<Vec<ActivityRecord>, GarminError> {
        self.record(Call::ListActivities { limit });
        self.require_session()?;
        if self.fail_listing {
            return Err(GarminError::Status {
                status: 500,
                body: "listing unavailable".into(),
            });
        }
        Ok(self
            .activities
            .iter()
            .take(limit as usize)
            .map(|(record, _)| record.clone())
            .collect())
    }

    async fn fetch_track(&self, activity_id: &str) -> Result<TrackData, GarminError> {
        self.record(Call::FetchTrack {
            activity_id: activity_id.to_string(),
        });
        self.require_session()?;
        if self.failing_tracks.contains(activity_id) {
            return Err(GarminError::Status {
                status: 502,
                body: format!("track {activity_id} unavailable"),
            });
        }
        self.activities
            .iter()
            .find(|(record, _)| record.id() == activity_id)
            .map(|(_, track)| track.clone())
            .ok_or_else(|| GarminError::NotFound(activity_id.to_string()))
    }
}
