//! Percent-fraction and percent-passing columns.
//!
//! The cumulative column is accumulated from the finest sieve (last row)
//! upward, so each row holds the share of mass retained on that sieve and on
//! every finer one. With no mass lost, the coarsest row ends at 100 %.

use tracing::{debug, warn};

use crate::domain::{CumulativeCurve, CumulativeRow, SievingSample};
use crate::error::AnalysisError;

/// Coarsest-row deviation from 100 % beyond which we log a mass-balance warning.
const MASS_BALANCE_TOL: f64 = 1e-6;

/// Build the cumulative curve of `sample`.
pub fn build(sample: &SievingSample) -> Result<CumulativeCurve, AnalysisError> {
    let total = sample.total_mass();
    if total == 0.0 {
        return Err(AnalysisError::DivisionByZero("total sample mass is zero"));
    }

    let mut rows: Vec<CumulativeRow> = sample
        .rows()
        .iter()
        .map(|r| CumulativeRow {
            grain_size_mm: r.grain_size_mm,
            fraction_mass_g: r.fraction_mass_g,
            percent_fraction: 100.0 * r.fraction_mass_g / total,
            percent_cumulative: 0.0,
        })
        .collect();

    let mut finer = 0.0;
    for row in rows.iter_mut().rev() {
        row.percent_cumulative = row.percent_fraction + finer;
        finer = row.percent_cumulative;
    }

    if (finer - 100.0).abs() > MASS_BALANCE_TOL {
        warn!(coarsest_cumulative = finer, "cumulative curve does not close at 100%");
    }
    debug!(rows = rows.len(), total_mass_g = total, "built cumulative curve");

    Ok(CumulativeCurve { rows })
}
