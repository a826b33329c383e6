//! HTTP client implementation for Garmin Connect.
//!
//! This module provides a reqwest-based implementation of the [`GarminClient`](crate::GarminClient) trait.
//! Login goes through the SSO sign-in form; the service ticket it returns is
//! exchanged for session cookies, which reqwest's cookie store then attaches to
//! every later call.

use crate::config::Config;
use crate::{ActivityRecord, Credentials, GarminClient, GarminError, SessionToken, TrackData};
use async_trait::async_trait;
use regex::Regex;
use secrecy::ExposeSecret;
use std::sync::{Arc, LazyLock};
use tokio::sync::RwLock;

static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ticket=(ST-[A-Za-z0-9\-]+)").expect("valid ticket pattern"));

/// Client for Garmin Connect using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestGarminClient {
    base_url: String,
    sso_url: String,
    client: reqwest::Client,
    session: Arc<RwLock<Option<SessionToken>>>,
}

impl ReqwestGarminClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Garmin Connect base URL (e.g., "https://connect.garmin.com")
    /// * `sso_url` - Garmin SSO base URL (e.g., "https://sso.garmin.com")
    pub fn new(base_url: &str, sso_url: &str) -> Result<Self, GarminError> {
        Self::from_config(&Config {
            base_url: base_url.into(),
            sso_url: sso_url.into(),
            ..Config::default()
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, GarminError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            sso_url: cfg.sso_url.trim_end_matches('/').to_string(),
            client,
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Current session, if `authenticate` has succeeded.
    async fn session(&self) -> Result<SessionToken, GarminError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(GarminError::NotAuthenticated)
    }

    /// Build a GET request carrying the headers Connect expects on data calls.
    fn get_request(
        &self,
        url: impl reqwest::IntoUrl,
        token: &SessionToken,
    ) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("NK", "NT")
            .header("X-Session-Ticket", token.expose())
    }

    /// GPX export URL with the id as a single percent-encoded path segment.
    fn track_url(&self, activity_id: &str) -> Result<reqwest::Url, GarminError> {
        let base = format!("{}/download-service/export/gpx/activity", self.base_url);
        let mut url = reqwest::Url::parse(&base)
            .map_err(|e| GarminError::Config(format!("invalid base url {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| GarminError::Config(format!("base url {base} cannot take a path")))?
            .push(activity_id);
        Ok(url)
    }

    /// Execute a request and expect a text response.
    async fn execute_text(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<String, GarminError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.text().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> GarminError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        GarminError::from_status(status, body_snippet)
    }

    /// Pull the SSO service ticket out of the sign-in response page.
    pub fn extract_ticket(body: &str) -> Option<String> {
        TICKET_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait]
impl GarminClient for ReqwestGarminClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, GarminError> {
        let signin_url = format!("{}/sso/signin", self.sso_url);
        let service_url = format!("{}/modern/", self.base_url);
        tracing::debug!(url = %signin_url, "signing in to garmin sso");

        let form = [
            ("username", credentials.identifier.as_str()),
            ("password", credentials.secret.expose_secret()),
            ("embed", "true"),
        ];
        let resp = self
            .client
            .post(&signin_url)
            .query(&[("service", service_url.as_str())])
            .form(&form)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body: String = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(256)
                .collect();
            return Err(GarminError::Auth(format!(
                "sign-in rejected with status {status}: {body}"
            )));
        }

        let page = resp.text().await?;
        let ticket = Self::extract_ticket(&page)
            .ok_or_else(|| GarminError::Auth("no service ticket in sign-in response".into()))?;

        let exchange = self
            .client
            .get(&service_url)
            .query(&[("ticket", ticket.as_str())])
            .send()
            .await?;
        if !exchange.status().is_success() {
            return Err(GarminError::Auth(format!(
                "ticket exchange rejected with status {}",
                exchange.status().as_u16()
            )));
        }

        let token = SessionToken::new(ticket);
        *self.session.write().await = Some(token.clone());
        tracing::debug!("garmin session established");
        Ok(token)
    }

    async fn list_activities(&self, limit: u32) -> Result<Vec<ActivityRecord>, GarminError> {
        let token = self.session().await?;
        let url = format!(
            "{}/activitylist-service/activities/search/activities",
            self.base_url
        );
        let qp = [("start", "0".to_string()), ("limit", limit.to_string())];
        let text = self
            .execute_text(self.get_request(&url, &token).query(&qp))
            .await?;
        // Decode from text so a shape mismatch can report what the service sent.
        serde_json::from_str::<Vec<ActivityRecord>>(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(512).collect();
            GarminError::Decode(format!("decoding activities: {e} - body: {body_snippet}"))
        })
    }

    async fn fetch_track(&self, activity_id: &str) -> Result<TrackData, GarminError> {
        let token = self.session().await?;
        let url = self.track_url(activity_id)?;
        self.execute_text(self.get_request(url, &token)).await
    }
}
