/// Tests for the startup path of the `gad` binary: argument parsing,
/// configuration and logging setup.
use clap::Parser;
use garmin_activity_downloader::cli::{Cli, Command};
use garmin_activity_downloader::config::AppConfig;
use garmin_activity_downloader::logging;
use garmin_connect_client::http_client::ReqwestGarminClient;

#[test]
fn test_version_flag_is_handled_by_clap() {
    let err = Cli::try_parse_from(["gad", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["gad", "upload", "/tmp"]).is_err());
}

#[test]
fn test_download_defaults_limit() {
    let cli = Cli::try_parse_from(["gad", "download", "./out"]).unwrap();
    let Command::Download(args) = cli.command;
    assert!(args.limit.is_none());
    assert_eq!(args.limit(), garmin_connect_client::DEFAULT_ACTIVITY_LIMIT);
}

#[test]
fn test_env_filter_creation() {
    let cfg = AppConfig::from_env_with(|k| match k {
        "GAD_LOG_LEVEL" => Some("debug,reqwest=warn".into()),
        _ => None,
    })
    .unwrap();
    let filter = logging::env_filter(&cfg.log_level);
    assert!(!format!("{:?}", filter).is_empty());
}

#[tokio::test]
async fn test_client_initialization_from_config() {
    let cfg = AppConfig::from_env_with(|k| match k {
        "GARMIN_CONNECT_BASE_URL" => Some("http://127.0.0.1:9/".into()),
        "GARMIN_SSO_URL" => Some("http://127.0.0.1:9/".into()),
        _ => None,
    })
    .unwrap();
    let client = ReqwestGarminClient::from_config(&cfg.client).expect("client");
    assert!(!format!("{:?}", client).is_empty());
}
