//! Strategy interface for seasonal-trend models.

use crate::core::{RegularSeries, SeasonalityMode};
use crate::error::Result;
use chrono::NaiveDate;

/// Seasonal period for monthly data with annual seasonality.
pub const SEASONAL_PERIOD: usize = 12;

/// Per-call model configuration, passed explicitly to every fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    pub seasonal_period: usize,
    pub seasonal_mode: SeasonalityMode,
    /// Number of months to forecast.
    pub horizon: usize,
}

impl ModelConfig {
    pub fn new(seasonal_mode: SeasonalityMode, horizon: usize) -> Self {
        Self {
            seasonal_period: SEASONAL_PERIOD,
            seasonal_mode,
            horizon,
        }
    }

    /// Same configuration under another seasonal mode.
    pub fn with_mode(self, seasonal_mode: SeasonalityMode) -> Self {
        Self {
            seasonal_mode,
            ..self
        }
    }
}

/// Smoothing parameters of a level/trend/seasonal model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    /// Level smoothing.
    pub alpha: f64,
    /// Trend smoothing.
    pub beta: f64,
    /// Seasonal smoothing.
    pub gamma: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.1,
        }
    }
}

/// What a fit produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FitArtifacts {
    /// One-step-ahead in-sample reconstruction, aligned with the history.
    pub fitted: Vec<f64>,
    /// Out-of-sample forecast; length equals the configured horizon.
    pub forecast: Vec<f64>,
    /// Month starts of the forecast, continuing from the last history month.
    pub forecast_timestamps: Vec<NaiveDate>,
    /// Seasonal mode the artifacts were produced under.
    pub mode: SeasonalityMode,
    pub params: SmoothingParams,
}

impl FitArtifacts {
    /// Observed minus fitted, for every history point.
    pub fn residuals(&self, series: &RegularSeries) -> Vec<f64> {
        series
            .values()
            .iter()
            .zip(self.fitted.iter())
            .map(|(y, f)| y - f)
            .collect()
    }
}

/// A seasonal-trend model: one pure operation from series and
/// configuration to artifacts.
///
/// Implementations hold no per-call state, so one instance can serve
/// concurrent callers.
pub trait SeasonalModel {
    /// Fit the model to `series` and forecast `config.horizon` months.
    fn fit(&self, series: &RegularSeries, config: &ModelConfig) -> Result<FitArtifacts>;

    /// Get the model name.
    fn name(&self) -> &str;
}

/// Type alias for boxed model trait objects.
pub type BoxedModel = Box<dyn SeasonalModel + Send + Sync>;

impl<M: SeasonalModel + ?Sized> SeasonalModel for Box<M> {
    fn fit(&self, series: &RegularSeries, config: &ModelConfig) -> Result<FitArtifacts> {
        (**self).fit(series, config)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
