//! Price Outlier Sampler
//!
//! Batch job that scans a directory of CSV price files for outliers.

use clap::{Parser, Subcommand};
use price_outliers::{
    config::Config,
    data::StdRandom,
    pipeline::{process_directory, process_file},
    types::FileOutcome,
};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "price-outliers")]
#[command(about = "Flag price outliers in a random window of each CSV file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults are used when omitted and none is found)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the sampler for a reproducible window
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every eligible file in a directory (1 or 2 files)
    Run {
        /// Directory holding the price files
        directory: PathBuf,
    },
    /// Process a single file
    Scan {
        /// Price file to scan
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRandom::seeded(seed),
        None => StdRandom::from_entropy(),
    };

    match cli.command {
        Commands::Run { directory } => {
            match process_directory(&directory, &config.detection, &mut rng) {
                Ok(summary) => {
                    tracing::debug!(?summary, "Batch complete");
                    println!("{}", json!({ "message": "Process completed successfully" }));
                    Ok(())
                }
                Err(e) => {
                    println!("{}", json!({ "error": e.to_string() }));
                    Err(e.into())
                }
            }
        }
        Commands::Scan { file } => {
            match process_file(&file, &config.detection, &mut rng) {
                FileOutcome::Outliers { report, count } => {
                    println!("{} outliers written to {}", count, report.display());
                }
                FileOutcome::NoOutliers => println!("No outliers found in {}", file.display()),
                FileOutcome::Failed { reason } => anyhow::bail!(reason),
            }
            Ok(())
        }
    }
}
