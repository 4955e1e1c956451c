//! Regular monthly series produced by the regularizer.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// Shift a date by a whole number of months.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| ForecastError::ComputationError(format!("date overflow at {date}")))
}

/// Signed number of calendar months from `from` to `to`, ignoring the day.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}

/// An evenly spaced monthly series with no gaps.
///
/// Timestamps sit on month starts, one month apart, strictly increasing.
/// Values are finite. A series always holds at least one observation and
/// exposes no mutating accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularSeries {
    timestamps: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl RegularSeries {
    /// Create a series, checking every invariant.
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if timestamps.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }
        if let Some(ts) = timestamps.iter().find(|ts| ts.day() != 1) {
            return Err(ForecastError::InvalidParameter(format!(
                "timestamp {ts} is not a month start"
            )));
        }
        if let Some(w) = timestamps
            .windows(2)
            .find(|w| months_between(w[0], w[1]) != 1)
        {
            return Err(ForecastError::InvalidParameter(format!(
                "timestamps {} and {} are not consecutive months",
                w[0], w[1]
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "non-finite value at index {i}"
            )));
        }

        Ok(Self { timestamps, values })
    }

    /// Number of months in the series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last timestamp in the series.
    pub fn last_timestamp(&self) -> NaiveDate {
        self.timestamps[self.timestamps.len() - 1]
    }

    /// Whether every value is strictly positive.
    pub fn is_strictly_positive(&self) -> bool {
        self.values.iter().all(|&v| v > 0.0)
    }

    /// The `horizon` month starts following the last observation.
    pub fn future_timestamps(&self, horizon: usize) -> Result<Vec<NaiveDate>> {
        let last = self.last_timestamp();
        (1..=horizon)
            .map(|h| {
                let h = u32::try_from(h).map_err(|_| {
                    ForecastError::InvalidParameter(format!("horizon {horizon} too large"))
                })?;
                add_months(last, h)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
        (0..n).map(|i| add_months(start, i as u32).unwrap()).collect()
    }

    #[test]
    fn month_helpers() {
        assert_eq!(month_start(ymd(2023, 2, 17)), ymd(2023, 2, 1));
        assert_eq!(add_months(ymd(2023, 11, 1), 3).unwrap(), ymd(2024, 2, 1));
        assert_eq!(months_between(ymd(2023, 11, 30), ymd(2024, 2, 1)), 3);
        assert_eq!(months_between(ymd(2024, 2, 1), ymd(2023, 11, 1)), -3);
    }

    #[test]
    fn accepts_consecutive_months() {
        let ts = monthly(ymd(2020, 1, 1), 5);
        let series = RegularSeries::new(ts, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.last_timestamp(), ymd(2020, 5, 1));
        assert!(series.is_strictly_positive());
    }

    #[test]
    fn rejects_empty_series() {
        assert_eq!(
            RegularSeries::new(vec![], vec![]),
            Err(ForecastError::EmptyData)
        );
    }

    #[test]
    fn rejects_gaps_and_mid_month_dates() {
        let gap = vec![ymd(2020, 1, 1), ymd(2020, 3, 1)];
        assert!(RegularSeries::new(gap, vec![1.0, 2.0]).is_err());

        let mid = vec![ymd(2020, 1, 15)];
        assert!(RegularSeries::new(mid, vec![1.0]).is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        let ts = monthly(ymd(2020, 1, 1), 2);
        assert!(RegularSeries::new(ts, vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn future_timestamps_continue_monthly() {
        let ts = monthly(ymd(2020, 11, 1), 2);
        let series = RegularSeries::new(ts, vec![0.0, -1.0]).unwrap();
        assert!(!series.is_strictly_positive());

        let future = series.future_timestamps(3).unwrap();
        assert_eq!(future, vec![ymd(2021, 1, 1), ymd(2021, 2, 1), ymd(2021, 3, 1)]);
        assert!(series.future_timestamps(0).unwrap().is_empty());
    }
}
