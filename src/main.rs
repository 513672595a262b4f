//! vlr-scout main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vlr_scout::config::{default_config, load_config, validate};
use vlr_scout::crawler::run_crawl;

/// vlr-scout: staged concurrent scraper for vlr.gg team rankings
///
/// Crawls the regional team rankings on vlr.gg and assembles one record per
/// team (roster, rank, recent results, map statistics) into a JSON dataset.
/// Interrupted runs resume against the existing dataset file.
#[derive(Parser, Debug)]
#[command(name = "vlr-scout")]
#[command(version)]
#[command(about = "Staged concurrent scraper for vlr.gg team rankings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the dataset output file
    #[arg(short = 'f', long, value_name = "FILE")]
    filename: Option<PathBuf>,

    /// Override the number of fetch workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => default_config().context("building default configuration")?,
    };

    if let Some(filename) = &cli.filename {
        config.output.dataset_path = filename.display().to_string();
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    validate(&config).context("validating configuration overrides")?;

    tracing::info!(
        "Crawling {} with {} workers, dataset at {}",
        config.site.host,
        config.crawler.workers,
        config.output.dataset_path
    );

    let report = match run_crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Run aborted: {}", e);
            return Err(e.into());
        }
    };

    if report.is_clean() {
        tracing::info!("Run completed successfully");
        Ok(ExitCode::SUCCESS)
    } else {
        for skip in &report.skips {
            tracing::warn!("Skipped {:?} '{}': {}", skip.unit, skip.path, skip.reason);
        }
        tracing::warn!(
            "Run completed with {} skipped units ({} teams added)",
            report.skips.len(),
            report.teams_added
        );
        Ok(ExitCode::FAILURE)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vlr_scout=info,warn"),
            1 => EnvFilter::new("vlr_scout=debug,info"),
            2 => EnvFilter::new("vlr_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
