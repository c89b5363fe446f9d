//! Dense percentile curve.
//!
//! Raw sieve tables are coarse (often ~16 rows). Every percentile and moment
//! statistic reads from one 401-point curve so they stay mutually consistent.

use tracing::debug;

use crate::domain::{CumulativeCurve, INTERPOLATION_POINTS, INTERPOLATION_STEP, InterpolatedCurve};
use crate::math::{grid, interp};

/// Interpolate grain size at every 0.25 % of cumulative mass.
pub fn interpolate(curve: &CumulativeCurve) -> InterpolatedCurve {
    // Stored coarsest-first; the support must ascend in cumulative percent.
    let xp: Vec<f64> = curve.rows().iter().rev().map(|r| r.percent_cumulative).collect();
    let fp: Vec<f64> = curve.rows().iter().rev().map(|r| r.grain_size_mm).collect();

    let cumulative_percent = grid(INTERPOLATION_POINTS, INTERPOLATION_STEP);
    let grain_size_mm = cumulative_percent.iter().map(|&x| interp(x, &xp, &fp)).collect();

    debug!(support = xp.len(), points = INTERPOLATION_POINTS, "interpolated percentile curve");

    InterpolatedCurve {
        cumulative_percent,
        grain_size_mm,
    }
}
