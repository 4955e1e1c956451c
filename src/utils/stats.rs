//! Statistical helpers.

use statrs::statistics::Statistics;

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Sample standard deviation (n - 1 denominator).
///
/// `None` when fewer than two values are given, since the statistic is
/// undefined there.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().std_dev())
}

/// Mean of the finite values; NaN when there are none.
pub fn finite_mean(values: &[f64]) -> f64 {
    values.iter().filter(|v| v.is_finite()).mean()
}
