//! Classical seasonal decomposition.
//!
//! The trend is a centered moving average over one seasonal period; the
//! seasonal component is the per-position mean of the detrended series,
//! tiled over the whole history.

use crate::core::{RegularSeries, SeasonalityMode};
use crate::error::{ForecastError, Result};
use crate::models::SEASONAL_PERIOD;
use crate::seasonality::{Decomposer, Decomposition};
use crate::transform::{centered_moving_average, fill_edges};
use crate::utils::{finite_mean, mean};

/// Moving-average decomposition into trend and seasonal components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassicalDecomposition {
    period: usize,
}

impl ClassicalDecomposition {
    /// Create a decomposer with the given seasonal period.
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Minimum history length: two full cycles, so the centered moving
    /// average leaves a defined value at every seasonal position.
    pub fn min_length(&self) -> usize {
        2 * self.period
    }

    fn seasonal_indices(&self, detrended: &[f64], mode: SeasonalityMode) -> Result<Vec<f64>> {
        let mut indices = Vec::with_capacity(self.period);
        for pos in 0..self.period {
            let at_pos: Vec<f64> = detrended
                .iter()
                .skip(pos)
                .step_by(self.period)
                .copied()
                .collect();
            let idx = finite_mean(&at_pos);
            if !idx.is_finite() {
                return Err(ForecastError::ComputationError(format!(
                    "no defined detrended value at seasonal position {pos}"
                )));
            }
            indices.push(idx);
        }

        let center = mean(&indices);
        match mode {
            SeasonalityMode::Additive => indices.iter_mut().for_each(|s| *s -= center),
            SeasonalityMode::Multiplicative => {
                if center.abs() < f64::EPSILON {
                    return Err(ForecastError::ComputationError(
                        "seasonal indices average to zero".to_string(),
                    ));
                }
                indices.iter_mut().for_each(|s| *s /= center);
            }
        }
        Ok(indices)
    }
}

impl Default for ClassicalDecomposition {
    fn default() -> Self {
        Self::new(SEASONAL_PERIOD)
    }
}

impl Decomposer for ClassicalDecomposition {
    fn decompose(&self, series: &RegularSeries, mode: SeasonalityMode) -> Result<Decomposition> {
        if self.period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                self.period
            )));
        }
        let n = series.len();
        if n < self.min_length() {
            return Err(ForecastError::InsufficientData {
                needed: self.min_length(),
                got: n,
            });
        }
        if mode == SeasonalityMode::Multiplicative && !series.is_strictly_positive() {
            return Err(ForecastError::InvalidParameter(
                "multiplicative decomposition requires strictly positive values".to_string(),
            ));
        }

        let values = series.values();
        let raw_trend = centered_moving_average(values, self.period);
        let detrended: Vec<f64> = values
            .iter()
            .zip(raw_trend.iter())
            .map(|(&y, &t)| match mode {
                SeasonalityMode::Additive => y - t,
                SeasonalityMode::Multiplicative => y / t,
            })
            .collect();

        let indices = self.seasonal_indices(&detrended, mode)?;
        let seasonal: Vec<f64> = (0..n).map(|i| indices[i % self.period]).collect();
        let trend = fill_edges(&raw_trend);

        if trend.iter().chain(seasonal.iter()).any(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(
                "decomposition produced non-finite values".to_string(),
            ));
        }

        Ok(Decomposition {
            trend,
            seasonal,
            fallback: false,
        })
    }

    fn name(&self) -> &str {
        "Classical"
    }
}
