use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use console::Term;
use garmin_activity_downloader::cli::{Cli, Command, DownloadArgs};
use garmin_activity_downloader::config::AppConfig;
use garmin_activity_downloader::{
    CredentialSource, DownloadPipeline, StreamPrompt, TerminalPrompt, logging,
};
use garmin_connect_client::http_client::ReqwestGarminClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Log level comes from `GAD_LOG_LEVEL` (or `RUST_LOG`), default `info`.
    let cfg = AppConfig::from_env()?;
    logging::init(&cfg.log_level);
    tracing::debug!("gad: log filter: {}", cfg.log_level);

    match cli.command {
        Command::Download(args) => download(args, cfg).await,
    }
}

async fn download(args: DownloadArgs, cfg: AppConfig) -> anyhow::Result<()> {
    let client = ReqwestGarminClient::from_config(&cfg.client)?;

    // The masked prompt reads and writes through stderr's terminal; without
    // one on both ends, answers come from stdin as plain lines.
    let prompt_term = Term::stderr();
    let source: Box<dyn CredentialSource> =
        if std::io::stdin().is_terminal() && prompt_term.is_term() {
            Box::new(TerminalPrompt::new(prompt_term))
        } else {
            Box::new(StreamPrompt::new(std::io::stdin().lock(), std::io::stderr()))
        };

    let limit = args.limit();
    let mut pipeline = DownloadPipeline::new(client, source).with_overwrite(cfg.overwrite);
    let report = pipeline.run(&args.destination, limit).await?;

    eprintln!(
        "saved {} activities to {}",
        report.activities.len(),
        args.destination.display()
    );
    Ok(())
}
