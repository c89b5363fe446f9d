//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - turns them into a validated sample + metadata
//! - runs the analysis pipeline
//! - prints the report and writes optional exports

use std::io::Write;

use clap::Parser;

use crate::analysis::analyze;
use crate::cli::{AnalyzeArgs, Cli, Command, OutputFormat};
use crate::domain::{SampleMetadata, SievingSample};
use crate::error::{AppError, SampleError};

/// Entry point for the `sieve` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Columns => handle_columns(),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let metadata = metadata_from_args(&args);
    let sample = SievingSample::new(args.sieves.clone())
        .map_err(|e| SampleError::new(metadata.display_name(), e))?;

    let analysis = analyze(&sample, &metadata)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => {
            write!(out, "{}", crate::report::format_summary(&analysis))
                .map_err(|e| AppError::new(2, format!("Failed to write report: {e}")))?;
        }
        OutputFormat::Csv => {
            crate::io::write_statistics_csv(&mut out, &analysis.statistics)?;
            writeln!(out).map_err(|e| AppError::new(2, format!("Failed to write report: {e}")))?;
            crate::io::write_porosity_csv(&mut out, &analysis.porosity_conductivity)?;
        }
        OutputFormat::Json => {
            crate::io::write_analysis_json(&mut out, &analysis)?;
            writeln!(out).map_err(|e| AppError::new(2, format!("Failed to write report: {e}")))?;
        }
    }

    // Optional exports.
    if let Some(dir) = &args.export_dir {
        crate::io::write_sample_exports(dir, &analysis)?;
    }

    Ok(())
}

fn handle_columns() -> Result<(), AppError> {
    for column in crate::report::fixed_columns() {
        println!("{column}");
    }
    println!("<grain size [mm]>...");
    Ok(())
}

pub fn metadata_from_args(args: &AnalyzeArgs) -> SampleMetadata {
    SampleMetadata {
        name: args.name.clone(),
        collection_date: args.date.clone(),
        latitude: args.lat,
        longitude: args.lon,
        user_porosity: args.porosity,
        shape_factor: args.shape_factor,
    }
}
