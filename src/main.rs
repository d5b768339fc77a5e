//! JSON-only CLI for the DWD pollen load forecast

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pollenflug::{region_catalog, ClientOptions, PollenApi, PollenflugError};

#[derive(Parser, Debug)]
#[command(name = "pollenflug")]
#[command(about = "Get pollen load data from the Deutscher Wetterdienst (JSON output only)")]
#[command(version)]
struct Args {
    /// Region ID
    #[arg(short, long)]
    region: Option<i64>,

    /// Partregion ID
    #[arg(short, long, default_value_t = -1)]
    partregion: i64,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bypass cache and force data update
    #[arg(long)]
    no_cache: bool,

    /// List all available regions
    #[arg(short, long)]
    list: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = if args.list {
        // The region listing is static and never touches the network
        let listing = json!({ "regions": region_catalog() });
        write_document(&listing, args.output.as_deref())
    } else if let Some(region_id) = args.region {
        run(region_id, args.partregion, args.no_cache, args.output.as_deref())
    } else {
        let help = json!({
            "status": "error",
            "error": "Missing required argument: region",
            "help": "Run with --help for usage information"
        });
        let _ = write_document(&help, None);
        return ExitCode::FAILURE;
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<PollenflugError>()
                .map_or(500, PollenflugError::status_code);
            let error = json!({
                "status": "error",
                "error": e.to_string(),
                "code": code,
            });
            let _ = write_document(&error, None);
            ExitCode::FAILURE
        }
    }
}

/// Fetch (or load from cache) and print one region's forecast
fn run(
    region_id: i64,
    partregion_id: i64,
    no_cache: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let mut api = PollenApi::new(ClientOptions::default())?;

    if let Err(e) = api.update(no_cache) {
        // The lookup below retries with a forced update before giving up
        warn!("Initial update failed: {}", e);
    }

    let region = api.get_pollen(region_id, partregion_id)?;
    let document = serde_json::to_value(region).context("Failed to serialize forecast")?;
    write_document(&document, output)
}

/// Write a JSON document to the output file, or stdout when none is given
fn write_document(document: &serde_json::Value, output: Option<&Path>) -> anyhow::Result<()> {
    let rendered =
        serde_json::to_string_pretty(document).context("Failed to render JSON output")?;
    match output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("Failed to write output file {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
