//! Export result tables to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Column names are fixed so exports of different samples line up.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analysis::SampleAnalysis;
use crate::domain::{CumulativeCurve, PorosityConductivityTable, StatisticSet};
use crate::error::AppError;
use crate::io::write_analysis_json_file;
use crate::report::AggregateTable;

pub const CUMULATIVE_HEADER: [&str; 4] = [
    "Grain Sizes [mm]",
    "Fraction Mass [g]",
    "Percentage Fraction [%]",
    "Cumulative Percentage [%]",
];

pub const STATISTICS_HEADER: [&str; 2] = ["Name", "Value"];

pub const POROSITY_HEADER: [&str; 3] = ["Name", "Porosity", "Corresponding kf [m/s]"];

fn csv_err(e: csv::Error) -> AppError {
    AppError::new(2, format!("Failed to write CSV: {e}"))
}

fn num(v: f64) -> String {
    format!("{v}")
}

/// Write the cumulative curve, coarsest sieve first.
pub fn write_cumulative_csv<W: Write>(writer: W, curve: &CumulativeCurve) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(CUMULATIVE_HEADER).map_err(csv_err)?;
    for r in curve.rows() {
        w.write_record([
            num(r.grain_size_mm),
            num(r.fraction_mass_g),
            num(r.percent_fraction),
            num(r.percent_cumulative),
        ])
        .map_err(csv_err)?;
    }
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))
}

/// Write the statistic catalogue as `Name,Value` rows.
pub fn write_statistics_csv<W: Write>(writer: W, stats: &StatisticSet) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(STATISTICS_HEADER).map_err(csv_err)?;
    for (stat, value) in stats.iter() {
        w.write_record([stat.name().to_string(), num(value)]).map_err(csv_err)?;
    }
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))
}

/// Write the porosity/conductivity table.
pub fn write_porosity_csv<W: Write>(writer: W, table: &PorosityConductivityTable) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(POROSITY_HEADER).map_err(csv_err)?;
    for r in table.rows() {
        w.write_record([
            r.estimator.name().to_string(),
            num(r.porosity),
            num(r.hydraulic_conductivity_m_per_s),
        ])
        .map_err(csv_err)?;
    }
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))
}

/// Write the multi-sample aggregate table (failed samples are not included).
pub fn write_aggregate_csv<W: Write>(writer: W, table: &AggregateTable) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(&table.columns).map_err(csv_err)?;
    for row in &table.rows {
        w.write_record(row.iter().map(|c| c.render())).map_err(csv_err)?;
    }
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))
}

/// Write the per-sample exports into `dir` and return their paths.
///
/// Files are named `<sample>_cumulative.csv`, `<sample>_statistics.csv`,
/// `<sample>_porosity.csv` and `<sample>.json`.
pub fn write_sample_exports(dir: &Path, analysis: &SampleAnalysis) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let stem = file_stem(analysis.metadata.display_name());
    let paths = [
        dir.join(format!("{stem}_cumulative.csv")),
        dir.join(format!("{stem}_statistics.csv")),
        dir.join(format!("{stem}_porosity.csv")),
        dir.join(format!("{stem}.json")),
    ];

    write_cumulative_csv(create(&paths[0])?, &analysis.cumulative)?;
    write_statistics_csv(create(&paths[1])?, &analysis.statistics)?;
    write_porosity_csv(create(&paths[2])?, &analysis.porosity_conductivity)?;
    write_analysis_json_file(&paths[3], analysis)?;

    info!(sample = analysis.metadata.display_name(), dir = %dir.display(), "wrote sample exports");
    Ok(paths.to_vec())
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))
}

/// Reduce a sample name to a safe file stem.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() { "sample".to_string() } else { stem }
}
