//! Write a sample analysis as JSON.
//!
//! The JSON is the "portable" representation of one analysis:
//! - sample metadata
//! - the cumulative curve
//! - the statistic catalogue as an ordered `[{name, value}]` list
//! - the porosity/conductivity rows
//!
//! NaN values (undefined porosity) are written as `null`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::analysis::SampleAnalysis;
use crate::error::AppError;

/// Write `analysis` as pretty JSON to any writer.
pub fn write_analysis_json<W: Write>(writer: W, analysis: &SampleAnalysis) -> Result<(), AppError> {
    serde_json::to_writer_pretty(writer, analysis)
        .map_err(|e| AppError::new(2, format!("Failed to write analysis JSON: {e}")))
}

/// Write `analysis` as pretty JSON to `path`.
pub fn write_analysis_json_file(path: &Path, analysis: &SampleAnalysis) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create analysis JSON '{}': {e}", path.display())))?;
    write_analysis_json(file, analysis)
}
