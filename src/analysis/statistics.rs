//! Characteristic diameters and derived sorting/shape statistics.
//!
//! All lookups read the 401-point percentile curve except the geometric
//! standard deviation, which works on the sieve intervals of the cumulative
//! curve in φ units (φ = −log2 d).
//!
//! References for the formulas:
//! - geometric mean / sorting index: Bunte & Abt (2001)
//! - Fredle index: dg / sorting index
//! - geometric standard deviation: Frings et al. (2011)

use tracing::debug;

use crate::domain::{CumulativeCurve, InterpolatedCurve, Statistic, StatisticSet};
use crate::error::AnalysisError;
use crate::math::{kurtosis, nan_sum, skewness, std_dev};

/// Riemann weight of one interpolated row: 0.25 % of the mass, as a fraction.
const MEAN_WEIGHT: f64 = 0.0025;

/// Compute the full statistic catalogue.
pub fn compute(curve: &CumulativeCurve, interpolated: &InterpolatedCurve) -> Result<StatisticSet, AnalysisError> {
    let mut values = [f64::NAN; Statistic::COUNT];
    let mut set = |stat: Statistic, value: f64| values[stat as usize] = value;

    for stat in Statistic::DIAMETERS {
        if let Some(p) = stat.percentile() {
            set(stat, interpolated.percentile(p)?);
        }
    }

    let d = |p: f64| interpolated.percentile(p);
    let (d10, d16, d30, d60, d84) = (d(10.0)?, d(16.0)?, d(30.0)?, d(60.0)?, d(84.0)?);

    let sizes = interpolated.grain_sizes();
    set(Statistic::MeanGrainSize, MEAN_WEIGHT * sizes.iter().sum::<f64>());

    let dg = (d16 * d84).sqrt();
    set(Statistic::GeometricMean, dg);

    if d16 == 0.0 {
        return Err(AnalysisError::DivisionByZero("d16 is zero (sorting index)"));
    }
    let sorting = (d84 / d16).sqrt();
    set(Statistic::SortingIndex, sorting);
    set(Statistic::FredleIndex, dg / sorting);

    let moments = || AnalysisError::invalid("interpolated curve is empty");
    set(Statistic::StandardDeviation, std_dev(sizes).ok_or_else(moments)?);
    set(Statistic::GeometricStandardDeviation, geometric_std(curve));
    set(Statistic::Skewness, skewness(sizes).ok_or_else(moments)?);
    set(Statistic::Kurtosis, kurtosis(sizes).ok_or_else(moments)?);

    if d10 == 0.0 {
        return Err(AnalysisError::DivisionByZero("d10 is zero (uniformity/curvature)"));
    }
    set(Statistic::UniformityCoefficient, d60 / d10);
    set(Statistic::CurvatureCoefficient, d30 * d30 / (d60 * d10));

    let stats = StatisticSet::from_values(values);
    debug!(
        d50 = stats.get(Statistic::D50),
        geometric_std = stats.get(Statistic::GeometricStandardDeviation),
        "computed statistics"
    );
    Ok(stats)
}

/// Geometric standard deviation in φ space (Frings et al. 2011).
///
/// Each sieve interval `(i-1, i)` contributes its φ midpoint, weighted by the
/// mass fraction retained on the coarser sieve `i-1`. The finest row's own
/// fraction has no interval below it and does not contribute.
pub fn geometric_std(curve: &CumulativeCurve) -> f64 {
    let intervals: Vec<(f64, f64)> = curve
        .rows()
        .windows(2)
        .map(|pair| {
            let phi_coarse = -pair[0].grain_size_mm.log2();
            let phi_fine = -pair[1].grain_size_mm.log2();
            let weight = pair[0].percent_fraction / 100.0;
            (weight, (phi_coarse + phi_fine) / 2.0)
        })
        .collect();

    let mean = nan_sum(intervals.iter().map(|&(w, m)| w * m));
    nan_sum(intervals.iter().map(|&(w, m)| w * (m - mean).powi(2))).sqrt()
}
