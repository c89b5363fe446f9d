//! Population moments of a series.
//!
//! All statistics here are the *biased* (population) forms: the interpolated
//! percentile curve is treated as the whole distribution, not a sample of it.
//!
//! - `std_dev`: `sqrt(m2)`
//! - `skewness`: `m3 / m2^1.5`
//! - `kurtosis`: Fisher (excess) form, `m4 / m2^2 - 3`
//!
//! where `mk` is the k-th central moment. A constant series gives `m2 = 0` and
//! the standardized moments come out NaN; that is left to propagate.

/// Central moments `(mean, m2, m3, m4)` of `data`, or `None` if empty.
pub fn central_moments(data: &[f64]) -> Option<(f64, f64, f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in data {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    Some((mean, m2 / n, m3 / n, m4 / n))
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    central_moments(data).map(|(_, m2, _, _)| m2.sqrt())
}

pub fn skewness(data: &[f64]) -> Option<f64> {
    central_moments(data).map(|(_, m2, m3, _)| m3 / m2.powf(1.5))
}

pub fn kurtosis(data: &[f64]) -> Option<f64> {
    central_moments(data).map(|(_, m2, _, m4)| m4 / (m2 * m2) - 3.0)
}

/// Sum that skips NaN terms.
pub fn nan_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().filter(|v| !v.is_nan()).sum()
}
