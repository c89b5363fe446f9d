//! Piecewise-linear interpolation over monotone support points.
//!
//! Edge policy matches the usual `interp(x, xp, fp)` convention:
//! - queries left of the support return `fp[0]`
//! - queries right of the support return `fp[last]`
//! - with repeated abscissas, the segment starting at the *last* support point
//!   with `xp[j] <= x` is used

/// Interpolate `fp` (sampled at ascending `xp`) at `x`.
///
/// # Panics
/// Panics if `xp` and `fp` differ in length or are empty. Callers build both
/// from the same table.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    assert_eq!(xp.len(), fp.len(), "interp: support length mismatch");
    assert!(!xp.is_empty(), "interp: empty support");

    let last = xp.len() - 1;
    if x < xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }

    // First index with xp > x; the segment starts one before it.
    let j = xp.partition_point(|&v| v <= x) - 1;
    let (x0, x1) = (xp[j], xp[j + 1]);
    let (y0, y1) = (fp[j], fp[j + 1]);
    let u = (x - x0) / (x1 - x0);
    y0 + u * (y1 - y0)
}

/// `n` evenly spaced values from `0` with spacing `step` (`i * step`, no accumulation).
pub fn grid(n: usize, step: f64) -> Vec<f64> {
    (0..n).map(|i| i as f64 * step).collect()
}
