//! CLI entry point for gallery-grab.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use gallery_grab::{DownloadLoop, HttpClient};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    // Diagnostics go to stderr; stdout carries the progress lines.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let client = HttpClient::try_new()?;
    let download_loop = DownloadLoop::new(args.loop_config());

    // The index-page error has already been printed by the loop.
    let Ok(stats) = download_loop
        .run(&client, args.index_url(), std::io::stdout())
        .await
    else {
        return Ok(ExitCode::FAILURE);
    };

    info!(
        completed = stats.completed(),
        retried = stats.retried(),
        abandoned = stats.abandoned(),
        "all downloads finished"
    );

    Ok(ExitCode::SUCCESS)
}
