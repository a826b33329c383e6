//! Minimal `GarminClient` trait and the data types exchanged with Garmin Connect.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod config;
pub mod fake;
pub mod http_client;

/// Number of activities requested when the caller does not supply a limit.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum GarminError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decoding error: {0}")]
    Decode(String),
    #[error("client is not authenticated")]
    NotAuthenticated,
    #[error("configuration error: {0}")]
    Config(String),
}

impl GarminError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            404 => GarminError::NotFound(body),
            401 | 403 => GarminError::Auth(body),
            _ => GarminError::Status { status, body },
        }
    }
}

/// Login identifier and secret collected for a single run.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub identifier: String,
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: SecretString::new(secret.into().into_boxed_str()),
        }
    }
}

/// Opaque proof of a successful login. Only lives in memory.
#[derive(Clone, Debug)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value.into().into_boxed_str()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Raw GPX payload as returned by the service.
pub type TrackData = String;

/// A single activity as listed by the service.
///
/// The whole object is kept as received, in its original field order, so it
/// can be written back out unchanged. `id` is pulled from the `id` field, or
/// from Garmin's `activityId` when `id` is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRecord {
    id: String,
    fields: Map<String, Value>,
}

impl ActivityRecord {
    /// Build a record from a JSON object, extracting its identifier.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, GarminError> {
        let id = extract_id(&fields).map_err(GarminError::Decode)?;
        Ok(Self { id, fields })
    }

    /// Build a record from any JSON value; non-objects are rejected.
    pub fn from_value(value: Value) -> Result<Self, GarminError> {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            other => Err(GarminError::Decode(format!(
                "expected activity object, got {other}"
            ))),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Compact JSON encoding, fields in retrieval order.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for ActivityRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActivityRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let fields = Map::deserialize(deserializer)?;
        let id = extract_id(&fields).map_err(D::Error::custom)?;
        Ok(Self { id, fields })
    }
}

fn extract_id(fields: &Map<String, Value>) -> Result<String, String> {
    let value = fields
        .get("id")
        .or_else(|| fields.get("activityId"))
        .ok_or_else(|| "activity has neither `id` nor `activityId`".to_string())?;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected string or number id, got {other}")),
    }
}

#[async_trait]
pub trait GarminClient: Send + Sync + 'static {
    /// Log in and bind the resulting session to this client.
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, GarminError>;

    /// List the most recent activities, newest first, as ordered by the service.
    async fn list_activities(&self, limit: u32) -> Result<Vec<ActivityRecord>, GarminError>;

    /// Download the GPX track of one activity.
    async fn fetch_track(&self, activity_id: &str) -> Result<TrackData, GarminError>;
}
