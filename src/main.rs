//! itch-harvest main entry point
//!
//! This is the command-line interface for the itch-harvest storefront
//! harvester.

use clap::{ArgGroup, Parser};
use itch_harvest::config::{load_config_with_hash, validate, Config};
use itch_harvest::output::{archive_file_name, create_archive_async};
use itch_harvest::url::normalize_creator;
use itch_harvest::{scrape_creator, ProgressEvent};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// itch-harvest: an itch.io creator storefront harvester
///
/// itch-harvest discovers every public project of a creator, saves each
/// project's metadata and images, and writes a creator index. It can also
/// run as an HTTP service that harvests creators in background jobs.
#[derive(Parser, Debug)]
#[command(name = "itch-harvest")]
#[command(version)]
#[command(about = "An itch.io creator storefront harvester", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["creator", "serve"])))]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Harvest one creator and exit
    #[arg(long, value_name = "NAME")]
    creator: Option<String>,

    /// Output directory for --creator (default: ./<creator>)
    #[arg(long, value_name = "DIR", requires = "creator")]
    out: Option<PathBuf>,

    /// Also zip the output directory to <creator>_itch.zip next to it
    #[arg(long, requires = "creator")]
    archive: bool,

    /// Run the HTTP job API
    #[arg(long)]
    serve: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            let cfg = Config::default();
            validate(&cfg)?;
            cfg
        }
    };

    if let Some(creator) = &cli.creator {
        handle_harvest(&config, creator, cli.out, cli.archive).await?;
    } else if cli.serve {
        itch_harvest::server::serve(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("itch_harvest=info,warn"),
            1 => EnvFilter::new("itch_harvest=debug,info"),
            2 => EnvFilter::new("itch_harvest=trace,debug"),
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

/// Handles --creator: harvests one creator into a local directory
async fn handle_harvest(
    config: &Config,
    raw_creator: &str,
    out: Option<PathBuf>,
    archive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let creator = normalize_creator(raw_creator)?;
    let output_dir = out.unwrap_or_else(|| PathBuf::from(&creator));

    let report = |event: ProgressEvent| match event {
        ProgressEvent::Total(total) => tracing::info!("{} project(s) to harvest", total),
        ProgressEvent::ItemDone(title) => tracing::info!("Done: {}", title),
    };

    let summary = scrape_creator(config, &creator, &output_dir, &report).await?;
    println!(
        "✓ Harvested {} project(s) for {} into {}",
        summary.project_count,
        summary.creator,
        output_dir.display()
    );

    if archive {
        let archive_path = output_dir
            .parent()
            .map(|parent| parent.join(archive_file_name(&creator)))
            .unwrap_or_else(|| PathBuf::from(archive_file_name(&creator)));
        let written = create_archive_async(output_dir.clone(), archive_path).await?;
        println!("✓ Archive written to: {}", written.display());
    }

    Ok(())
}
