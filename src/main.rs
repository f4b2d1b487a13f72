//! CLI entry point for the studio downloader.

use anyhow::Result;
use clap::Parser;
use studio_downloader_core::{DownloadCap, Enumerator, StudioClient, StudioConfig};
use tracing::{debug, info};

mod cli;

use cli::Args;

// One request at a time; a current-thread runtime is all the run needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let config = StudioConfig::default();
    let client = StudioClient::new(&config)?;
    let mut cap = DownloadCap::new(args.num_images);

    info!(
        output = %config.output_root.display(),
        limit = ?cap.limit(),
        "Studio downloader starting"
    );

    let stats = Enumerator::new(&client, &config).run(&mut cap).await?;

    info!(
        leaves = stats.leaves,
        written = stats.files_written,
        skipped = stats.files_skipped,
        rate_limited = stats.rate_limit_retries,
        cap_reached = stats.cap_reached,
        "Download complete"
    );

    Ok(())
}
