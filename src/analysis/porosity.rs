//! Porosity estimators and Kozeny–Carman hydraulic conductivity.
//!
//! The literature formulas are empirical fits; their constants and exponents
//! are kept exactly as published.
//!
//! Undefined porosity (no user value, or `n = 1`) yields NaN conductivity for
//! that row only. Other rows of the table stay valid.

use tracing::{debug, warn};

use crate::domain::{
    CumulativeCurve, Estimator, PorosityConductivityRow, PorosityConductivityTable, Statistic, StatisticSet,
};
use crate::error::AnalysisError;
use crate::math::nan_sum;

/// Sieve opening whose percent passing enters the Frings et al. estimator.
pub const FRINGS_REFERENCE_MM: f64 = 5.0;

/// Kozeny–Carman constant for kf in m/s with D_eff in m.
const KOZENY_CARMAN_CONSTANT: f64 = 19900.0;

/// Exponents weighting the coarser / finer bound of a sieve interval.
const COARSE_EXPONENT: f64 = 0.404;
const FINE_EXPONENT: f64 = 0.595;

/// Build the porosity/conductivity table.
pub fn estimate(
    stats: &StatisticSet,
    curve: &CumulativeCurve,
    user_porosity: Option<f64>,
    shape_factor: f64,
) -> Result<PorosityConductivityTable, AnalysisError> {
    if !(shape_factor.is_finite() && shape_factor > 0.0) {
        return Err(AnalysisError::invalid(format!(
            "shape factor must be finite and > 0, got {shape_factor}"
        )));
    }

    let d50 = stats.get(Statistic::D50);
    let geometric_std = stats.get(Statistic::GeometricStandardDeviation);
    let reference = curve
        .nearest_row(FRINGS_REFERENCE_MM)
        .ok_or_else(|| AnalysisError::invalid("cumulative curve is empty"))?;

    if user_porosity.is_none() {
        warn!("no user porosity supplied; user row is undefined");
    }

    let d_eff_cm = effective_diameter_cm(curve)?;
    let rows = Estimator::ALL
        .into_iter()
        .map(|estimator| {
            let porosity = match estimator {
                Estimator::CarlingReader => carling_reader(d50),
                Estimator::WuWang => wu_wang(d50),
                Estimator::Wooster => wooster(geometric_std),
                Estimator::Frings => frings(geometric_std, reference.percent_cumulative),
                Estimator::User => user_porosity.unwrap_or(f64::NAN),
            };
            PorosityConductivityRow {
                estimator,
                porosity,
                hydraulic_conductivity_m_per_s: kozeny_carman(porosity, d_eff_cm, shape_factor),
            }
        })
        .collect();

    debug!(
        d_eff_cm,
        frings_reference_mm = reference.grain_size_mm,
        "estimated porosity and conductivity"
    );

    Ok(PorosityConductivityTable { rows })
}

/// Carling & Reader (1982).
pub fn carling_reader(d50_mm: f64) -> f64 {
    -0.0333 + 0.4665 / d50_mm.powf(0.21)
}

/// Wu & Wang (2006).
pub fn wu_wang(d50_mm: f64) -> f64 {
    0.13 + 0.21 / (d50_mm + 0.002).powf(0.21)
}

/// Wooster et al. (2008).
pub fn wooster(geometric_std: f64) -> f64 {
    0.621 * (-0.457 * geometric_std).exp()
}

/// Frings et al. (2011); `percent_passing_ref` is in percent.
pub fn frings(geometric_std: f64, percent_passing_ref: f64) -> f64 {
    0.353 - 0.068 * geometric_std + 0.146 * (percent_passing_ref / 100.0)
}

/// Effective grain diameter of the whole sample, in cm.
///
/// Each interval gets a weighted mean diameter
/// `(d_coarse/10)^0.404 * (d_fine/10)^0.595` (mm → cm); the effective diameter
/// is `100 / Σ (percent_fraction / D_interval)` over the finer row of every
/// interval. `0/0` terms (empty class on a zero diameter) are skipped.
///
/// Fails with `DivisionByZero` when no interval holds any mass (everything
/// retained on the coarsest sieve).
pub fn effective_diameter_cm(curve: &CumulativeCurve) -> Result<f64, AnalysisError> {
    let inverse_sum = nan_sum(curve.rows().windows(2).map(|pair| {
        let d_interval =
            (pair[0].grain_size_mm / 10.0).powf(COARSE_EXPONENT) * (pair[1].grain_size_mm / 10.0).powf(FINE_EXPONENT);
        pair[1].percent_fraction / d_interval
    }));
    if inverse_sum == 0.0 {
        return Err(AnalysisError::DivisionByZero(
            "effective diameter: no mass in any sieve interval",
        ));
    }
    Ok(100.0 / inverse_sum)
}

/// Kozeny–Carman hydraulic conductivity in m/s.
///
/// NaN when `porosity` is undefined or exactly 1 (void ratio undefined).
pub fn kozeny_carman(porosity: f64, d_eff_cm: f64, shape_factor: f64) -> f64 {
    if porosity.is_nan() || porosity == 1.0 {
        return f64::NAN;
    }
    let e = porosity / (1.0 - porosity);
    KOZENY_CARMAN_CONSTANT * (d_eff_cm / 100.0).powi(2) * (1.0 / shape_factor.powi(2)) * (e.powi(3) / (1.0 + e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{cumulative, interpolate::interpolate, statistics};
    use crate::domain::SievingSample;

    fn table(user: Option<f64>) -> PorosityConductivityTable {
        let sample = SievingSample::from_pairs([
            (63.0, 0.0),
            (31.5, 250.0),
            (16.0, 600.0),
            (8.0, 900.0),
            (5.0, 500.0),
            (4.0, 200.0),
            (2.0, 350.0),
            (1.0, 150.0),
            (0.5, 50.0),
        ])
        .unwrap();
        let curve = cumulative::build(&sample).unwrap();
        let stats = statistics::compute(&curve, &interpolate(&curve)).unwrap();
        estimate(&stats, &curve, user, 6.1).unwrap()
    }

    #[test]
    fn kozeny_carman_literal() {
        // e = 0.4 / 0.6; kf = 19900 * (0.5/100)^2 / 6.1^2 * e^3 / (1 + e)
        let kf = kozeny_carman(0.4, 0.5, 6.1);
        assert!((kf - 0.002_376_899_877_571_741_4).abs() < 1e-15, "kf = {kf}");
    }

    #[test]
    fn kozeny_carman_undefined_porosity() {
        assert!(kozeny_carman(f64::NAN, 0.5, 6.1).is_nan());
        assert!(kozeny_carman(1.0, 0.5, 6.1).is_nan());
    }

    #[test]
    fn literature_formulas() {
        assert!((carling_reader(1.0) - 0.4332).abs() < 1e-12);
        assert!((wooster(0.0) - 0.621).abs() < 1e-12);
        assert!((frings(1.0, 50.0) - (0.353 - 0.068 + 0.073)).abs() < 1e-12);
        assert!((wu_wang(0.998) - 0.34).abs() < 1e-12);
    }

    #[test]
    fn table_has_fixed_rows_in_order() {
        let t = table(Some(0.3));
        let names: Vec<&str> = t.rows().iter().map(|r| r.estimator.name()).collect();
        assert_eq!(
            names,
            vec![
                "Carling and Reader (1982)",
                "Wu and Wang (2006)",
                "Wooster et al. (2008)",
                "Frings et al. (2011)",
                "User input",
            ]
        );
        let user = t.get(Estimator::User).unwrap();
        assert_eq!(user.porosity, 0.3);
        assert!(user.hydraulic_conductivity_m_per_s > 0.0);
    }

    #[test]
    fn missing_user_porosity_is_partial_result() {
        let t = table(None);
        let user = t.get(Estimator::User).unwrap();
        assert!(user.porosity.is_nan());
        assert!(user.hydraulic_conductivity_m_per_s.is_nan());
        assert!(matches!(user.checked_porosity(), Err(AnalysisError::UndefinedPorosity(_))));

        for row in t.rows().iter().filter(|r| r.estimator != Estimator::User) {
            assert!(row.porosity.is_finite(), "{}", row.estimator.name());
            assert!(row.hydraulic_conductivity_m_per_s.is_finite(), "{}", row.estimator.name());
        }
    }

    #[test]
    fn frings_uses_five_mm_row() {
        let sample = SievingSample::from_pairs([(8.0, 30.0), (5.0, 30.0), (2.0, 40.0)]).unwrap();
        let curve = cumulative::build(&sample).unwrap();
        let stats = statistics::compute(&curve, &interpolate(&curve)).unwrap();
        let t = estimate(&stats, &curve, None, 6.1).unwrap();
        let sigma = stats.get(Statistic::GeometricStandardDeviation);
        let expected = frings(sigma, 70.0);
        assert!((t.get(Estimator::Frings).unwrap().porosity - expected).abs() < 1e-12);
    }

    #[test]
    fn effective_diameter_of_single_interval() {
        // One interval 20 mm -> 10 mm holding all the mass:
        // D = 2^0.404 * 1^0.595 cm, D_eff = 100 / (100 / D) = D.
        let sample = SievingSample::from_pairs([(20.0, 0.0), (10.0, 100.0)]).unwrap();
        let curve = cumulative::build(&sample).unwrap();
        assert!((effective_diameter_cm(&curve).unwrap() - 2.0_f64.powf(0.404)).abs() < 1e-12);
    }

    #[test]
    fn all_mass_on_coarsest_sieve_has_no_effective_diameter() {
        let sample = SievingSample::from_pairs([(20.0, 100.0), (10.0, 0.0)]).unwrap();
        let curve = cumulative::build(&sample).unwrap();
        let stats = statistics::compute(&curve, &interpolate(&curve)).unwrap();

        assert!(matches!(effective_diameter_cm(&curve), Err(AnalysisError::DivisionByZero(_))));
        assert!(matches!(
            estimate(&stats, &curve, Some(0.3), 6.1),
            Err(AnalysisError::DivisionByZero(_))
        ));
    }

    #[test]
    fn rejects_bad_shape_factor() {
        let sample = SievingSample::from_pairs([(20.0, 1.0), (10.0, 1.0)]).unwrap();
        let curve = cumulative::build(&sample).unwrap();
        let stats = statistics::compute(&curve, &interpolate(&curve)).unwrap();
        assert!(matches!(estimate(&stats, &curve, None, 0.0), Err(AnalysisError::InvalidInput(_))));
    }
}
