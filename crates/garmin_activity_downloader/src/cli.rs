//! Command-line interface for the `gad` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use garmin_connect_client::DEFAULT_ACTIVITY_LIMIT;

/// gad - download your recent Garmin Connect activities
///
/// Logs in interactively, then saves each activity as `<id>.json` plus its
/// GPX track as `<id>.gpx.xml`.
#[derive(Debug, Parser)]
#[command(name = "gad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Downloads activities to specific destination
    Download(DownloadArgs),
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Existing directory that receives the files
    pub destination: PathBuf,

    /// Number of activities to download
    #[arg(short, long, value_name = "NUMBER", allow_hyphen_values = true)]
    pub limit: Option<String>,
}

impl DownloadArgs {
    /// Effective limit; see [`parse_limit`].
    pub fn limit(&self) -> u32 {
        parse_limit(self.limit.as_deref())
    }
}

/// Interpret the `--limit` option.
///
/// Leading digits are used the way a lenient integer parse would
/// (`"3abc"` is 3, `"0x10"` is 16). Absent, unparseable, zero or negative
/// values fall back to [`DEFAULT_ACTIVITY_LIMIT`]; values too large for `u32`
/// saturate.
pub fn parse_limit(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_ACTIVITY_LIMIT;
    };
    let s = raw.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let digits_end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() || negative {
        return DEFAULT_ACTIVITY_LIMIT;
    }
    match u32::from_str_radix(digits, radix) {
        Ok(0) => DEFAULT_ACTIVITY_LIMIT,
        Ok(n) => n,
        Err(_) => u32::MAX,
    }
}
