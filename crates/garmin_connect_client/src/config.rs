use crate::GarminError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://connect.garmin.com";
pub const DEFAULT_SSO_URL: &str = "https://sso.garmin.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub sso_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            sso_url: DEFAULT_SSO_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, GarminError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, GarminError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base_url = get("GARMIN_CONNECT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let sso_url = get("GARMIN_SSO_URL").unwrap_or_else(|| DEFAULT_SSO_URL.into());
        let timeout = match get("GARMIN_HTTP_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    GarminError::Config(format!("GARMIN_HTTP_TIMEOUT_SECS is not a number: {raw}"))
                })?,
        };
        Ok(Self {
            base_url,
            sso_url,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_uses_defaults() {
        let cfg = Config::from_env_with(|_| None).expect("cfg");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.sso_url, DEFAULT_SSO_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "GARMIN_CONNECT_BASE_URL" => Some("http://localhost:8080".into()),
            "GARMIN_SSO_URL" => Some("http://localhost:9090".into()),
            "GARMIN_HTTP_TIMEOUT_SECS" => Some("5".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.sso_url, "http://localhost:9090");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        let get = |k: &str| match k {
            "GARMIN_HTTP_TIMEOUT_SECS" => Some("soon".into()),
            _ => None,
        };
        assert!(matches!(
            Config::from_env_with(get),
            Err(GarminError::Config(_))
        ));
    }
}
