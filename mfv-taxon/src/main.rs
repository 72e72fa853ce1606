//! mfv-taxon - Manifest taxonomy validator
//!
//! Checks that each row of a sample manifest declares a common name and a
//! taxon ID that the NCBI taxonomy agrees on, then prints a pass/fail report.
//!
//! Exit status: 0 when the manifest validates, 1 when any row has an error.
//! Registry, manifest and configuration failures abort with a non-zero status.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mfv_common::config::{load_config, API_KEY_ENV_VAR};
use mfv_taxon::reconcile::validate_manifest;
use mfv_taxon::{NcbiClient, RateLimitedRegistry};
use tracing::info;

/// Command-line arguments for mfv-taxon
#[derive(Parser, Debug)]
#[command(name = "mfv-taxon")]
#[command(about = "Validate manifest common names against taxon IDs using NCBI Taxonomy")]
#[command(version)]
struct Args {
    /// Manifest to check (CSV, or tab-separated for .tsv/.txt)
    manifest: PathBuf,

    /// Config file (else MFV_CONFIG, else ~/.config/manifest-validator/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// NCBI API key
    #[arg(long, env = API_KEY_ENV_VAR, hide_env_values = true)]
    api_key: Option<String>,

    /// Minimum delay between registry requests in milliseconds (floor 335)
    #[arg(long)]
    min_interval_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse command-line arguments
    let args = Args::parse();

    let loaded = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let mut config = loaded.config.clone();
    if let Some(key) = args.api_key {
        config.registry.api_key = Some(key);
    }
    if let Some(interval) = args.min_interval_ms {
        config.registry.min_interval_ms = interval;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // Initialize tracing
    mfv_common::logging::init_tracing(&config.logging)?;

    info!("Starting mfv-taxon {}", env!("CARGO_PKG_VERSION"));
    loaded.log_origin();
    info!("Manifest: {}", args.manifest.display());
    info!("Registry: {}", config.registry.base_url);

    let client = NcbiClient::new(&config.registry).context("Failed to create NCBI client")?;
    let registry = RateLimitedRegistry::new(client, config.registry.min_interval());

    let report = validate_manifest(&args.manifest, registry)
        .await
        .context("Validation aborted")?;

    println!("{}", report);

    if report.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
