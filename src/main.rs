// ==============================================================================
// main.rs - Genemap Processor Entry Point
// ==============================================================================
// Description: Main entry point for OMIM genemap2 processing
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use genemap_processor::output::OutputFormat;
use genemap_processor::processor::GenemapProcessor;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the genemap2.txt file (download from https://omim.org/downloads)
    #[arg(short, long)]
    input_file: PathBuf,

    /// Directory to write output artifacts to (created if absent)
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Output formats (parquet, json, sqlite); repeatable
    #[arg(short, long, default_values_t = vec!["parquet".to_string()])]
    format: Vec<String>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genemap_processor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Genemap Processor starting...");

    // Parse command line arguments
    let args = Args::parse();

    // Parse output formats
    let mut formats = Vec::new();
    for name in &args.format {
        let format = match name.to_lowercase().as_str() {
            "parquet" => OutputFormat::Parquet,
            "json" => OutputFormat::Json,
            "sqlite" | "db" => OutputFormat::Sqlite,
            _ => {
                warn!("Invalid output format '{}', using parquet", name);
                OutputFormat::Parquet
            }
        };
        if !formats.contains(&format) {
            formats.push(format);
        }
    }

    // Process the export
    let processor = GenemapProcessor::new(args.input_file, args.output_dir, formats);

    let paths = processor.process()?;
    for (format, path) in &paths {
        info!("Wrote {:?} artifact: {:?}", format, path);
    }

    Ok(())
}
