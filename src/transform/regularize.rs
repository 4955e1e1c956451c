//! Regularization of irregular samples onto a monthly grid.
//!
//! Samples are sorted, averaged into month-start buckets, and empty months
//! are filled by linear interpolation. Any gap left at either edge takes the
//! nearest known value.

use crate::core::{add_months, month_start, months_between, RawSample, RegularSeries};
use crate::error::{ForecastError, Result};
use tracing::debug;

/// Convert raw samples into a gap-free monthly series.
///
/// Fails with [`ForecastError::EmptyData`] on empty input, and with a
/// `values` validation error when a regularized month is not finite.
pub fn regularize(samples: &[RawSample]) -> Result<RegularSeries> {
    let mut sorted = samples.to_vec();
    // Stable: samples sharing a timestamp keep input order.
    sorted.sort_by_key(|s| s.timestamp);

    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(f), Some(l)) => (month_start(f.timestamp), month_start(l.timestamp)),
        _ => return Err(ForecastError::EmptyData),
    };

    let n_months = months_between(first, last) as usize + 1;
    // Running mean per bucket; no bucket sum is ever formed.
    let mut bucketed = vec![f64::NAN; n_months];
    let mut counts = vec![0usize; n_months];
    for sample in &sorted {
        let idx = months_between(first, sample.timestamp) as usize;
        counts[idx] += 1;
        bucketed[idx] = if counts[idx] == 1 {
            sample.value
        } else {
            bucketed[idx] + (sample.value - bucketed[idx]) / counts[idx] as f64
        };
    }

    let gaps = counts.iter().filter(|&&c| c == 0).count();
    let merged = samples.len() - (n_months - gaps);
    debug!(
        samples = samples.len(),
        months = n_months,
        gaps,
        merged,
        "regularized monthly series"
    );

    let values = interpolate_series(&bucketed, true);
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::validation(
            "values",
            format!("month {i} falls outside the representable range after regularization"),
        ));
    }
    let timestamps = (0..n_months)
        .map(|i| add_months(first, i as u32))
        .collect::<Result<Vec<_>>>()?;

    RegularSeries::new(timestamps, values)
}

/// Linear interpolation over NaN runs.
///
/// Interior runs are interpolated between their bounding values. With
/// `fill_edges`, a leading run takes the first known value and a trailing run
/// the last one; otherwise edge runs stay NaN.
pub fn interpolate_series(values: &[f64], fill_edges: bool) -> Vec<f64> {
    let mut result = values.to_vec();
    let n = result.len();

    let mut i = 0;
    while i < n {
        if !result[i].is_nan() {
            i += 1;
            continue;
        }

        let start = i;
        while i < n && result[i].is_nan() {
            i += 1;
        }
        let end = i;

        let left = start.checked_sub(1).map(|j| result[j]);
        let right = (end < n).then(|| result[end]);

        match (left, right) {
            (Some(l), Some(r)) => {
                let segments = (end - start + 1) as f64;
                for (j, idx) in (start..end).enumerate() {
                    let t = (j + 1) as f64 / segments;
                    result[idx] = l + t * (r - l);
                }
            }
            (Some(l), None) if fill_edges => result[start..end].fill(l),
            (None, Some(r)) if fill_edges => result[start..end].fill(r),
            _ => {}
        }
    }

    result
}

/// Fill NaN edges: leading NaNs take the first defined value (back fill),
/// then trailing NaNs take the last defined value (forward fill).
///
/// Interior NaNs take the next defined value. An all-NaN input is returned
/// unchanged.
pub fn fill_edges(values: &[f64]) -> Vec<f64> {
    let mut result = values.to_vec();

    // Back fill.
    let mut next = None;
    for v in result.iter_mut().rev() {
        if v.is_nan() {
            if let Some(n) = next {
                *v = n;
            }
        } else {
            next = Some(*v);
        }
    }

    // Forward fill.
    let mut prev = None;
    for v in result.iter_mut() {
        if v.is_nan() {
            if let Some(p) = prev {
                *v = p;
            }
        } else {
            prev = Some(*v);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(y: i32, m: u32, d: u32, value: f64) -> RawSample {
        RawSample::new(ymd(y, m, d), value)
    }

    #[test]
    fn sorts_and_snaps_to_month_start() {
        let samples = vec![
            sample(2020, 3, 20, 30.0),
            sample(2020, 1, 5, 10.0),
            sample(2020, 2, 28, 20.0),
        ];
        let series = regularize(&samples).unwrap();
        assert_eq!(
            series.timestamps(),
            &[ymd(2020, 1, 1), ymd(2020, 2, 1), ymd(2020, 3, 1)]
        );
        assert_eq!(series.values(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn interpolates_missing_month() {
        let samples = vec![
            sample(2020, 1, 1, 100.0),
            sample(2020, 2, 1, 110.0),
            sample(2020, 4, 1, 130.0),
            sample(2020, 5, 1, 140.0),
        ];
        let series = regularize(&samples).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.timestamps()[2], ymd(2020, 3, 1));
        assert_relative_eq!(series.values()[2], 120.0, epsilon = 1e-12);
    }

    #[test]
    fn averages_samples_in_same_month() {
        let samples = vec![
            sample(2020, 1, 3, 10.0),
            sample(2020, 1, 20, 20.0),
            sample(2020, 2, 1, 40.0),
        ];
        let series = regularize(&samples).unwrap();
        assert_eq!(series.values(), &[15.0, 40.0]);
    }

    #[test]
    fn duplicate_timestamps_are_averaged() {
        let samples = vec![sample(2020, 1, 1, 1.0), sample(2020, 1, 1, 3.0)];
        let series = regularize(&samples).unwrap();
        assert_eq!(series.values(), &[2.0]);
    }

    #[test]
    fn large_values_in_one_month_do_not_overflow() {
        let samples = vec![
            sample(2020, 1, 2, f64::MAX),
            sample(2020, 1, 9, f64::MAX),
            sample(2020, 2, 1, 1.0),
        ];
        let series = regularize(&samples).unwrap();
        assert_eq!(series.values(), &[f64::MAX, 1.0]);
    }

    #[test]
    fn unrepresentable_interpolation_is_a_values_error() {
        let samples = vec![sample(2020, 1, 1, f64::MAX), sample(2020, 3, 1, -f64::MAX)];
        let err = regularize(&samples).unwrap_err();
        assert_eq!(err.field(), Some("values"));
    }

    #[test]
    fn single_sample_yields_single_month() {
        let series = regularize(&[sample(2022, 7, 14, 5.0)]).unwrap();
        assert_eq!(series.timestamps(), &[ymd(2022, 7, 1)]);
        assert_eq!(series.values(), &[5.0]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(regularize(&[]), Err(ForecastError::EmptyData));
    }

    #[test]
    fn long_gap_is_linear() {
        let samples = vec![sample(2020, 1, 1, 0.0), sample(2020, 5, 1, 40.0)];
        let series = regularize(&samples).unwrap();
        assert_eq!(series.values(), &[0.0, 10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn interpolate_fills_edges_when_asked() {
        let nan = f64::NAN;
        let filled = interpolate_series(&[nan, 2.0, nan, 4.0, nan], true);
        assert_eq!(filled, vec![2.0, 2.0, 3.0, 4.0, 4.0]);

        let unfilled = interpolate_series(&[nan, 2.0, nan, 4.0, nan], false);
        assert!(unfilled[0].is_nan());
        assert_eq!(unfilled[2], 3.0);
        assert!(unfilled[4].is_nan());
    }

    #[test]
    fn fill_edges_back_then_forward() {
        let nan = f64::NAN;
        let filled = fill_edges(&[nan, nan, 1.0, 2.0, nan]);
        assert_eq!(filled, vec![1.0, 1.0, 1.0, 2.0, 2.0]);

        let all_nan = fill_edges(&[nan, nan]);
        assert!(all_nan.iter().all(|v| v.is_nan()));
    }
}
