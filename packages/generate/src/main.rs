#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool for generating interactive homeless services maps.
//!
//! Loads the services dataset, prints a summary report, and writes an icon
//! map, a clustered map and a density heatmap as standalone HTML files.

use std::path::PathBuf;

use clap::Parser;
use service_map_analytics::{format_report, summarize};
use service_map_generate::{GenerateOptions, export_json, prepare, render_maps};
use service_map_source::centroid::Jitter;

#[derive(Parser)]
#[command(name = "service_map_generate", about = "Services map generation tool")]
struct Cli {
    /// Services dataset (JSON array of records)
    #[arg(long, default_value = "../assets/homeless_services_hackathon.json")]
    input: PathBuf,

    /// Directory to write the generated files to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Seed for coordinate jitter (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Alternate zip centroid table (TOML)
    #[arg(long)]
    centroids: Option<PathBuf>,

    /// Jitter standard deviation in degrees (0 disables jitter)
    #[arg(long, default_value_t = Jitter::DEFAULT_STD_DEV)]
    jitter_std_dev: f64,

    /// Also write the enriched records as JSON
    #[arg(long)]
    export_json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let rule = "=".repeat(70);
    println!("San Diego Homeless Services Enhanced Geospatial Analysis");
    println!("{rule}");

    let options = GenerateOptions {
        input: cli.input,
        output_dir: cli.output_dir,
        seed: cli.seed,
        centroids: cli.centroids,
        jitter_std_dev: cli.jitter_std_dev,
    };

    let records = match prepare(&options) {
        Ok(records) => records,
        Err(e) => {
            log::error!("{e}");
            println!("Could not load services data. Exiting.");
            return Err(e.into());
        }
    };
    println!("Extracted {} services", records.len());

    print!("\n{}", format_report(&summarize(&records)));

    println!("\nCreating maps...");
    let outcome = render_maps(&records, &options.output_dir);
    let mut written = outcome.written.clone();

    let mut export_error = None;
    if cli.export_json {
        match export_json(&records, &options.output_dir) {
            Ok(path) => written.push(path),
            Err(e) => {
                log::error!("Failed to export enriched records: {e}");
                export_error = Some(e);
            }
        }
    }

    println!("\n{rule}");
    println!("Enhanced homeless services analysis complete!");
    println!("\nGenerated files:");
    for path in &written {
        println!("- {}", path.display());
    }

    outcome.into_result()?;
    if let Some(e) = export_error {
        return Err(e.into());
    }
    Ok(())
}
