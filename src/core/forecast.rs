//! Forecast result returned to collaborators.

use crate::core::input::DATE_FORMAT;
use crate::core::RegularSeries;
use crate::error::{ForecastError, Result};
use crate::models::FitArtifacts;
use crate::scenario::Scenario;
use crate::seasonality::Decomposition;
use crate::uncertainty::UncertaintyBand;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// History, forecast with band, and decomposition of one invocation.
///
/// Dates are ISO `YYYY-MM-DD` strings. `history_*`, `trend` and `seasonal`
/// share one length; `forecast_*`, `lower_bound` and `upper_bound` share
/// another (the requested horizon).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub history_dates: Vec<String>,
    pub history_values: Vec<f64>,
    pub forecast_dates: Vec<String>,
    pub forecast_values: Vec<f64>,
    pub lower_bound: Vec<f64>,
    pub upper_bound: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
}

fn format_dates(dates: &[NaiveDate]) -> Vec<String> {
    dates
        .iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect()
}

impl ForecastOutput {
    /// Merge the per-stage results into the output structure.
    ///
    /// Purely structural: every element is carried over in order. Fails
    /// only if the stage results disagree on lengths.
    pub fn assemble(
        series: &RegularSeries,
        fit: &FitArtifacts,
        band: &UncertaintyBand,
        decomposition: &Decomposition,
    ) -> Result<Self> {
        let n = series.len();
        let h = fit.forecast.len();
        let check = |expected: usize, got: usize, what: &str| {
            if expected == got {
                Ok(())
            } else {
                Err(ForecastError::ComputationError(format!(
                    "{what}: expected {expected} values, got {got}"
                )))
            }
        };
        check(h, fit.forecast_timestamps.len(), "forecast dates")?;
        check(h, band.lower.len(), "lower bound")?;
        check(h, band.upper.len(), "upper bound")?;
        check(n, decomposition.trend.len(), "trend")?;
        check(n, decomposition.seasonal.len(), "seasonal")?;

        Ok(Self {
            history_dates: format_dates(series.timestamps()),
            history_values: series.values().to_vec(),
            forecast_dates: format_dates(&fit.forecast_timestamps),
            forecast_values: fit.forecast.clone(),
            lower_bound: band.lower.clone(),
            upper_bound: band.upper.clone(),
            trend: decomposition.trend.clone(),
            seasonal: decomposition.seasonal.clone(),
        })
    }

    /// Forecast horizon in months.
    pub fn horizon(&self) -> usize {
        self.forecast_values.len()
    }

    /// What the decomposition leaves unexplained: history - trend - seasonal.
    pub fn decomposition_residuals(&self) -> Vec<f64> {
        self.history_values
            .iter()
            .zip(self.trend.iter().zip(self.seasonal.iter()))
            .map(|(y, (t, s))| y - (t + s))
            .collect()
    }

    /// Copy with forecast and band scaled by the scenario multiplier.
    ///
    /// History and decomposition are left untouched.
    pub fn with_scenario(&self, scenario: Scenario) -> Self {
        let k = scenario.multiplier();
        let scale = |v: &[f64]| v.iter().map(|x| x * k).collect::<Vec<_>>();
        Self {
            forecast_values: scale(&self.forecast_values),
            lower_bound: scale(&self.lower_bound),
            upper_bound: scale(&self.upper_bound),
            ..self.clone()
        }
    }
}
