//! Caller-facing input contract.

use crate::core::{add_months, month_start};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ISO date format used on both sides of the contract.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default forecast horizon in months.
pub const DEFAULT_PERIODS: usize = 12;

/// Seasonal component form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    /// Seasonal effects add a fixed offset per calendar position.
    #[default]
    Additive,
    /// Seasonal effects scale the level per calendar position.
    Multiplicative,
}

impl SeasonalityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Multiplicative => "multiplicative",
        }
    }
}

/// One observation of the raw, possibly irregular, history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub timestamp: NaiveDate,
    pub value: f64,
}

impl RawSample {
    pub fn new(timestamp: NaiveDate, value: f64) -> Self {
        Self { timestamp, value }
    }
}

fn default_periods() -> usize {
    DEFAULT_PERIODS
}

/// Request for a single forecasting invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastInput {
    /// ISO `YYYY-MM-DD` dates, aligned with `values`.
    pub dates: Vec<String>,
    /// Observed values; must be finite.
    pub values: Vec<f64>,
    /// Number of months to forecast.
    #[serde(default = "default_periods")]
    pub periods: usize,
    pub seasonality_mode: SeasonalityMode,
}

impl ForecastInput {
    pub fn new(dates: Vec<String>, values: Vec<f64>, seasonality_mode: SeasonalityMode) -> Self {
        Self {
            dates,
            values,
            periods: DEFAULT_PERIODS,
            seasonality_mode,
        }
    }

    /// Set the forecast horizon.
    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods;
        self
    }

    /// Check the contract and parse the samples.
    ///
    /// Fails with [`ForecastError::Validation`] naming the first offending
    /// field. Values are checked before dates so a NaN is always reported
    /// against `values`.
    pub fn validate(&self) -> Result<Vec<RawSample>> {
        if self.periods == 0 {
            return Err(ForecastError::validation("periods", "must be greater than 0"));
        }
        if self.values.is_empty() {
            return Err(ForecastError::validation("values", "must not be empty"));
        }
        if let Some(i) = self.values.iter().position(|v| v.is_nan()) {
            return Err(ForecastError::validation(
                "values",
                format!("contains NaN at index {i}"),
            ));
        }
        if let Some(i) = self.values.iter().position(|v| v.is_infinite()) {
            return Err(ForecastError::validation(
                "values",
                format!("contains an infinite value at index {i}"),
            ));
        }
        if self.dates.len() != self.values.len() {
            return Err(ForecastError::validation(
                "dates",
                format!(
                    "expected {} entries to match values, got {}",
                    self.values.len(),
                    self.dates.len()
                ),
            ));
        }

        let samples = self
            .dates
            .iter()
            .zip(self.values.iter())
            .map(|(date, &value)| {
                let timestamp = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(
                    |e| ForecastError::validation("dates", format!("cannot parse {date:?}: {e}")),
                )?;
                Ok(RawSample::new(timestamp, value))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(last) = samples.iter().map(|s| s.timestamp).max() {
            self.check_horizon(month_start(last))?;
        }
        Ok(samples)
    }

    /// The last forecast month must be a representable date.
    fn check_horizon(&self, last: NaiveDate) -> Result<()> {
        let out_of_range = || {
            ForecastError::validation(
                "periods",
                format!("{} months past {last} is out of the date range", self.periods),
            )
        };
        let months = u32::try_from(self.periods).map_err(|_| out_of_range())?;
        add_months(last, months).map_err(|_| out_of_range())?;
        Ok(())
    }
}
