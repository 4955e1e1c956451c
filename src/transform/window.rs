//! Moving-window filters.

/// Centered moving average used for classical trend estimation.
///
/// An odd `window` averages `window` points centered on each index. An even
/// `window` uses the 2 x `window` filter: `window + 1` points with half weight
/// on both ends, so the result stays centered. The first and last
/// `window / 2` points have no full window and are NaN.
pub fn centered_moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let n = series.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 {
        return result;
    }

    let half = window / 2;
    if n < 2 * half + 1 {
        return result;
    }

    let even = window % 2 == 0;
    for i in half..n - half {
        let segment = &series[i - half..=i + half];
        result[i] = if even {
            let inner: f64 = segment[1..segment.len() - 1].iter().sum();
            (inner + 0.5 * (segment[0] + segment[segment.len() - 1])) / window as f64
        } else {
            segment.iter().sum::<f64>() / window as f64
        };
    }

    result
}
