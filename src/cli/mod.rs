//! Command-line parsing for the `sieve` binary.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! engine: the engine never sees CLI arguments, only the structured sample and
//! metadata built from them.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{DEFAULT_SHAPE_FACTOR, SieveRow};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sieve", version, about = "Grain-size statistics from sieving tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyse one sieving table and print statistics, porosity and conductivity.
    Analyze(AnalyzeArgs),
    /// Print the stable column names of the multi-sample aggregate table.
    Columns,
}

/// Output format of `sieve analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Text,
    /// Statistics and porosity tables as CSV.
    Csv,
    /// The whole analysis as JSON.
    Json,
}

#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Sieve row as SIZE_MM:MASS_G, coarsest first (repeat per sieve).
    #[arg(short = 's', long = "sieve", value_name = "SIZE:MASS", value_parser = parse_sieve_row, required = true)]
    pub sieves: Vec<SieveRow>,

    /// Sample name.
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Collection date (e.g. 2021-08-17 or 17.08.2021).
    #[arg(long)]
    pub date: Option<String>,

    /// Latitude of the sampling site.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the sampling site.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Porosity measured by other means (fraction 0-1).
    #[arg(long)]
    pub porosity: Option<f64>,

    /// Kozeny–Carman shape factor (6.10 for rounded sediment).
    #[arg(long, default_value_t = DEFAULT_SHAPE_FACTOR)]
    pub shape_factor: f64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write cumulative/statistics/porosity CSV files and the JSON bundle into this directory.
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

/// Parse `SIZE:MASS` into a sieve row.
pub fn parse_sieve_row(raw: &str) -> Result<SieveRow, String> {
    let (size, mass) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected SIZE:MASS, got '{raw}'"))?;
    let size: f64 = size
        .trim()
        .parse()
        .map_err(|e| format!("invalid grain size '{size}': {e}"))?;
    let mass: f64 = mass
        .trim()
        .parse()
        .map_err(|e| format!("invalid fraction mass '{mass}': {e}"))?;
    Ok(SieveRow::new(size, mass))
}
