//! End-to-end forecasting pipeline.
//!
//! Validate -> regularize -> fit (with mode fallback) -> band, and
//! decompose on the same regular series -> assemble.

use crate::core::{ForecastInput, ForecastOutput, SeasonalityMode};
use crate::error::Result;
use crate::models::{
    fit_with_fallback, HoltWinters, ModelConfig, SeasonalModel, SmoothingParams, SEASONAL_PERIOD,
};
use crate::seasonality::{decompose_or_fallback, ClassicalDecomposition, Decomposer};
use crate::transform::regularize;
use crate::uncertainty;
use crate::utils::NelderMeadConfig;
use tracing::debug;

/// Engine-wide settings, fixed for the engine's lifetime.
///
/// The seasonal period is always [`SEASONAL_PERIOD`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Search settings for parameter and initial-state estimation.
    pub optimizer: NelderMeadConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            optimizer: NelderMeadConfig::default().with_max_iter(2000),
        }
    }
}

impl EngineConfig {
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }
}

/// Forecast output plus diagnostics about how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub output: ForecastOutput,
    /// Seasonal mode of the fit that produced the forecast; additive when a
    /// multiplicative request fell back.
    pub mode_used: SeasonalityMode,
    pub params: SmoothingParams,
    /// Residual standard deviation behind the band.
    pub dispersion: f64,
    /// Whether the decomposition degraded to trend = history, seasonal = 0.
    pub decomposition_fallback: bool,
}

/// Stateless forecasting engine over a model and a decomposition strategy.
///
/// Holds only configuration, so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ForecastEngine<M = HoltWinters, D = ClassicalDecomposition> {
    model: M,
    decomposer: D,
    config: EngineConfig,
}

impl ForecastEngine {
    /// Holt-Winters with estimated states and classical decomposition.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            model: HoltWinters::new().with_optimizer(config.optimizer.clone()),
            decomposer: ClassicalDecomposition::new(SEASONAL_PERIOD),
            config,
        }
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: SeasonalModel, D: Decomposer> ForecastEngine<M, D> {
    /// Engine over custom strategies, with default settings.
    pub fn with_strategies(model: M, decomposer: D) -> Self {
        Self {
            model,
            decomposer,
            config: EngineConfig::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one forecast.
    ///
    /// Only input validation failures and an unrecoverable fit escape;
    /// infeasible multiplicative fits and decompositions fall back silently.
    pub fn run(&self, input: &ForecastInput) -> Result<ForecastOutput> {
        self.run_detailed(input).map(|report| report.output)
    }

    /// Run one forecast and report the fit diagnostics alongside the output.
    #[tracing::instrument(
        skip_all,
        fields(
            model = self.model.name(),
            mode = input.seasonality_mode.as_str(),
            periods = input.periods
        )
    )]
    pub fn run_detailed(&self, input: &ForecastInput) -> Result<ForecastReport> {
        let samples = input.validate()?;
        let series = regularize(&samples)?;
        debug!(samples = samples.len(), months = series.len(), "regularized input");

        let model_config = ModelConfig::new(input.seasonality_mode, input.periods);
        let fit = fit_with_fallback(&self.model, &series, &model_config)?;
        let band = uncertainty::estimate(&series, &fit);
        let decomposition =
            decompose_or_fallback(&self.decomposer, &series, input.seasonality_mode);

        let output = ForecastOutput::assemble(&series, &fit, &band, &decomposition)?;
        debug!(
            mode_used = fit.mode.as_str(),
            dispersion = band.dispersion,
            decomposition_fallback = decomposition.fallback,
            "forecast complete"
        );

        Ok(ForecastReport {
            output,
            mode_used: fit.mode,
            params: fit.params,
            dispersion: band.dispersion,
            decomposition_fallback: decomposition.fallback,
        })
    }
}
