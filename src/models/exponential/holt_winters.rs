//! Holt-Winters forecasting model.
//!
//! Triple exponential smoothing with an additive trend and an additive or
//! multiplicative seasonal component. Initial states are estimated from the
//! data together with the smoothing parameters.

use crate::core::{RegularSeries, SeasonalityMode};
use crate::error::{ForecastError, Result};
use crate::models::{FitArtifacts, ModelConfig, SeasonalModel, SmoothingParams};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use tracing::debug;

const PARAM_BOUNDS: (f64, f64) = (0.0001, 0.9999);
const EPS: f64 = 1e-10;

/// Level, trend and seasonal states.
///
/// `seasonals[t % period]` holds the seasonal state used to predict time `t`.
#[derive(Debug, Clone, PartialEq)]
struct State {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
}

impl State {
    /// Pack smoothing parameters and states into one optimization vector:
    /// `[alpha, beta, gamma, level, trend, s_0 .. s_{m-1}]`.
    fn to_vector(&self, params: SmoothingParams) -> Vec<f64> {
        let mut x = Vec::with_capacity(5 + self.seasonals.len());
        x.extend([params.alpha, params.beta, params.gamma, self.level, self.trend]);
        x.extend_from_slice(&self.seasonals);
        x
    }

    fn from_vector(x: &[f64]) -> (SmoothingParams, Self) {
        let params = SmoothingParams {
            alpha: x[0],
            beta: x[1],
            gamma: x[2],
        };
        let state = Self {
            level: x[3],
            trend: x[4],
            seasonals: x[5..].to_vec(),
        };
        (params, state)
    }
}

/// Holt-Winters forecaster.
///
/// The model equations for additive seasonality:
/// - Level: `l_t = α(y_t - s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
/// - Seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}`
/// - Forecast: `ŷ_{t+h} = l_t + h*b_t + s_{t+h-m}`
///
/// For multiplicative seasonality:
/// - Level: `l_t = α(y_t / s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
/// - Seasonal: `s_t = γ(y_t / l_t) + (1-γ)s_{t-m}`
/// - Forecast: `ŷ_{t+h} = (l_t + h*b_t) * s_{t+h-m}`
///
/// By default α, β, γ and the initial level, trend and seasonal states are
/// all estimated by minimizing the one-step-ahead squared error, starting
/// from a heuristic guess built from the first season(s). Multiplicative
/// seasonality requires strictly positive data.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Fixed smoothing parameters; `None` estimates everything.
    fixed: Option<SmoothingParams>,
    optimizer: NelderMeadConfig,
}

impl HoltWinters {
    /// Model with every parameter and initial state estimated.
    pub fn new() -> Self {
        Self {
            fixed: None,
            optimizer: NelderMeadConfig::default().with_max_iter(2000),
        }
    }

    /// Model with fixed smoothing parameters and heuristic initial states.
    pub fn with_params(alpha: f64, beta: f64, gamma: f64) -> Self {
        let (lo, hi) = PARAM_BOUNDS;
        Self {
            fixed: Some(SmoothingParams {
                alpha: alpha.clamp(lo, hi),
                beta: beta.clamp(lo, hi),
                gamma: gamma.clamp(lo, hi),
            }),
            optimizer: NelderMeadConfig::default(),
        }
    }

    /// Override the optimizer settings used for estimation.
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Heuristic starting states from the first season(s).
    ///
    /// The level is the first-season mean projected back to just before the
    /// first observation. The trend is the average season-over-season change
    /// when two full seasons exist, zero otherwise. Seasonal positions with
    /// no observation start neutral.
    fn initial_state(values: &[f64], period: usize, mode: SeasonalityMode) -> State {
        let k = values.len().min(period);
        let first_season = &values[..k];
        let season_mean = first_season.iter().sum::<f64>() / k as f64;

        let trend = if values.len() >= 2 * period {
            let sum: f64 = (0..period)
                .map(|i| (values[period + i] - values[i]) / period as f64)
                .sum();
            sum / period as f64
        } else {
            0.0
        };

        let level = season_mean - trend * (k as f64 + 1.0) / 2.0;

        let neutral = match mode {
            SeasonalityMode::Additive => 0.0,
            SeasonalityMode::Multiplicative => 1.0,
        };
        let mut seasonals = vec![neutral; period];
        for (i, &y) in first_season.iter().enumerate() {
            let base = level + (i as f64 + 1.0) * trend;
            seasonals[i] = match mode {
                SeasonalityMode::Additive => y - base,
                SeasonalityMode::Multiplicative => {
                    if base.abs() > EPS {
                        y / base
                    } else {
                        1.0
                    }
                }
            };
        }
        Self::normalize_seasonals(&mut seasonals, mode);

        State {
            level,
            trend,
            seasonals,
        }
    }

    /// Normalize seasonal components to maintain constraints.
    /// Additive: seasonals sum to 0
    /// Multiplicative: seasonals average to 1
    fn normalize_seasonals(seasonals: &mut [f64], mode: SeasonalityMode) {
        let period = seasonals.len();
        if period == 0 {
            return;
        }
        let mean = seasonals.iter().sum::<f64>() / period as f64;

        match mode {
            SeasonalityMode::Additive => seasonals.iter_mut().for_each(|s| *s -= mean),
            SeasonalityMode::Multiplicative => {
                if mean.abs() > EPS {
                    seasonals.iter_mut().for_each(|s| *s /= mean);
                }
            }
        }
    }

    /// Run the smoothing recursion over `values`.
    ///
    /// Returns the one-step-ahead predictions for every observation and the
    /// final state.
    fn smooth(
        values: &[f64],
        params: SmoothingParams,
        init: &State,
        mode: SeasonalityMode,
    ) -> (Vec<f64>, State) {
        let SmoothingParams { alpha, beta, gamma } = params;
        let period = init.seasonals.len();
        let mut level = init.level;
        let mut trend = init.trend;
        let mut seasonals = init.seasonals.clone();
        let mut fitted = Vec::with_capacity(values.len());

        for (t, &y) in values.iter().enumerate() {
            let idx = t % period;
            let s = seasonals[idx];

            let prediction = match mode {
                SeasonalityMode::Additive => level + trend + s,
                SeasonalityMode::Multiplicative => (level + trend) * s,
            };
            fitted.push(prediction);

            let level_prev = level;
            match mode {
                SeasonalityMode::Additive => {
                    level = alpha * (y - s) + (1.0 - alpha) * (level_prev + trend);
                    trend = beta * (level - level_prev) + (1.0 - beta) * trend;
                    seasonals[idx] = gamma * (y - level) + (1.0 - gamma) * s;
                }
                SeasonalityMode::Multiplicative => {
                    let deseasonalized = if s.abs() > EPS { y / s } else { y };
                    level = alpha * deseasonalized + (1.0 - alpha) * (level_prev + trend);
                    trend = beta * (level - level_prev) + (1.0 - beta) * trend;
                    if level.abs() > EPS {
                        seasonals[idx] = gamma * (y / level) + (1.0 - gamma) * s;
                    }
                }
            }
        }

        (
            fitted,
            State {
                level,
                trend,
                seasonals,
            },
        )
    }

    fn sse(values: &[f64], fitted: &[f64]) -> f64 {
        values
            .iter()
            .zip(fitted)
            .map(|(y, f)| (y - f).powi(2))
            .sum()
    }

    /// Estimate smoothing parameters and initial states jointly.
    fn estimate(
        &self,
        values: &[f64],
        start: &State,
        mode: SeasonalityMode,
    ) -> (SmoothingParams, State) {
        let x0 = start.to_vector(SmoothingParams::default());
        let mut bounds = vec![PARAM_BOUNDS; 3];
        bounds.resize(x0.len(), (f64::NEG_INFINITY, f64::INFINITY));

        let result = nelder_mead(
            |x| {
                let (params, init) = State::from_vector(x);
                let (fitted, _) = Self::smooth(values, params, &init, mode);
                Self::sse(values, &fitted)
            },
            &x0,
            Some(bounds.as_slice()),
            self.optimizer.clone(),
        );
        debug!(
            iterations = result.iterations,
            converged = result.converged,
            sse = result.optimal_value,
            "estimated holt-winters states"
        );

        State::from_vector(&result.optimal_point)
    }

    fn forecast(state: &State, n: usize, horizon: usize, mode: SeasonalityMode) -> Vec<f64> {
        let period = state.seasonals.len();
        (1..=horizon)
            .map(|h| {
                let s = state.seasonals[(n + h - 1) % period];
                let level = state.level + h as f64 * state.trend;
                match mode {
                    SeasonalityMode::Additive => level + s,
                    SeasonalityMode::Multiplicative => level * s,
                }
            })
            .collect()
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonalModel for HoltWinters {
    fn fit(&self, series: &RegularSeries, config: &ModelConfig) -> Result<FitArtifacts> {
        let values = series.values();
        let mode = config.seasonal_mode;
        let period = config.seasonal_period;

        if period == 0 {
            return Err(ForecastError::InvalidParameter(
                "seasonal period must be positive".to_string(),
            ));
        }
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if mode == SeasonalityMode::Multiplicative && !series.is_strictly_positive() {
            return Err(ForecastError::ComputationError(
                "multiplicative seasonality requires strictly positive values".to_string(),
            ));
        }

        let forecast_timestamps = series.future_timestamps(config.horizon)?;
        let start = Self::initial_state(values, period, mode);
        let (params, init) = match self.fixed {
            Some(params) => (params, start),
            None => self.estimate(values, &start, mode),
        };

        let (fitted, last) = Self::smooth(values, params, &init, mode);
        let forecast = Self::forecast(&last, values.len(), config.horizon, mode);

        if fitted.iter().chain(forecast.iter()).any(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(format!(
                "{} fit produced non-finite values",
                self.name_for(mode)
            )));
        }

        Ok(FitArtifacts {
            fitted,
            forecast,
            forecast_timestamps,
            mode,
            params,
        })
    }

    fn name(&self) -> &str {
        "HoltWinters"
    }
}

impl HoltWinters {
    fn name_for(&self, mode: SeasonalityMode) -> &'static str {
        match mode {
            SeasonalityMode::Additive => "HoltWinters(additive)",
            SeasonalityMode::Multiplicative => "HoltWinters(multiplicative)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::add_months;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use std::f64::consts::PI;

    fn make_series(values: Vec<f64>) -> RegularSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let ts = (0..values.len())
            .map(|i| add_months(start, i as u32).unwrap())
            .collect();
        RegularSeries::new(ts, values).unwrap()
    }

    fn make_seasonal_data(n: usize, trend: f64, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                100.0 + trend * t + amplitude * (2.0 * PI * t / 12.0).sin()
            })
            .collect()
    }

    fn config(mode: SeasonalityMode, horizon: usize) -> ModelConfig {
        ModelConfig::new(mode, horizon)
    }

    #[test]
    fn forecast_length_matches_horizon() {
        let series = make_series(make_seasonal_data(36, 0.5, 10.0));
        let fit = HoltWinters::new()
            .fit(&series, &config(SeasonalityMode::Additive, 7))
            .unwrap();

        assert_eq!(fit.forecast.len(), 7);
        assert_eq!(fit.forecast_timestamps.len(), 7);
        assert_eq!(fit.fitted.len(), 36);
        assert_eq!(fit.mode, SeasonalityMode::Additive);
    }

    #[test]
    fn flat_series_forecasts_flat() {
        let series = make_series(vec![100.0; 24]);
        for mode in [SeasonalityMode::Additive, SeasonalityMode::Multiplicative] {
            let fit = HoltWinters::new().fit(&series, &config(mode, 12)).unwrap();
            for &f in &fit.forecast {
                assert_relative_eq!(f, 100.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn pure_seasonal_series_is_reproduced() {
        let values = make_seasonal_data(24, 0.0, 50.0);
        let series = make_series(values);
        let fit = HoltWinters::new()
            .fit(&series, &config(SeasonalityMode::Additive, 12))
            .unwrap();

        let expected = make_seasonal_data(36, 0.0, 50.0);
        for (h, &f) in fit.forecast.iter().enumerate() {
            assert_relative_eq!(f, expected[24 + h], epsilon = 1e-6);
        }
    }

    #[test]
    fn linear_trend_is_extrapolated() {
        let values: Vec<f64> = (0..36).map(|i| 50.0 + 2.0 * i as f64).collect();
        let series = make_series(values);
        let fit = HoltWinters::new()
            .fit(&series, &config(SeasonalityMode::Additive, 3))
            .unwrap();

        assert_relative_eq!(fit.forecast[0], 122.0, epsilon = 1e-6);
        assert_relative_eq!(fit.forecast[2], 126.0, epsilon = 1e-6);
    }

    #[test]
    fn estimation_never_worse_than_heuristic_start() {
        let values: Vec<f64> = make_seasonal_data(36, 1.0, 8.0)
            .iter()
            .enumerate()
            .map(|(i, v)| v + if i % 3 == 0 { 4.0 } else { -2.0 })
            .collect();
        let series = make_series(values.clone());
        let cfg = config(SeasonalityMode::Additive, 12);

        let estimated = HoltWinters::new().fit(&series, &cfg).unwrap();
        let start = HoltWinters::initial_state(&values, 12, SeasonalityMode::Additive);
        let (heuristic, _) = HoltWinters::smooth(
            &values,
            SmoothingParams::default(),
            &start,
            SeasonalityMode::Additive,
        );

        let sse_estimated = HoltWinters::sse(&values, &estimated.fitted);
        let sse_heuristic = HoltWinters::sse(&values, &heuristic);
        assert!(sse_estimated <= sse_heuristic + 1e-9);
    }

    #[test]
    fn multiplicative_rejects_non_positive_data() {
        let mut values = make_seasonal_data(24, 0.0, 10.0);
        values[5] = 0.0;
        let series = make_series(values);
        let err = HoltWinters::new()
            .fit(&series, &config(SeasonalityMode::Multiplicative, 12))
            .unwrap_err();
        assert!(matches!(err, ForecastError::ComputationError(_)));
    }

    #[test]
    fn multiplicative_fit_on_positive_data() {
        let values: Vec<f64> = (0..36)
            .map(|i| {
                let base = 100.0 + 0.5 * i as f64;
                base * (1.0 + 0.2 * (2.0 * PI * i as f64 / 12.0).sin())
            })
            .collect();
        let series = make_series(values);
        let fit = HoltWinters::new()
            .fit(&series, &config(SeasonalityMode::Multiplicative, 12))
            .unwrap();

        assert_eq!(fit.mode, SeasonalityMode::Multiplicative);
        assert!(fit.forecast.iter().all(|v| v.is_finite() && *v > 0.0));
    }

    #[test]
    fn short_series_is_not_rejected() {
        for n in [1, 5, 13] {
            let series = make_series((0..n).map(|i| 10.0 + i as f64).collect());
            let fit = HoltWinters::new()
                .fit(&series, &config(SeasonalityMode::Additive, 4))
                .unwrap();
            assert_eq!(fit.fitted.len(), n);
            assert_eq!(fit.forecast.len(), 4);
        }
    }

    #[test]
    fn fixed_params_are_clamped_and_reported() {
        let model = HoltWinters::with_params(1.5, -0.2, 0.3);
        let series = make_series(make_seasonal_data(24, 0.2, 5.0));
        let fit = model
            .fit(&series, &config(SeasonalityMode::Additive, 2))
            .unwrap();

        assert_relative_eq!(fit.params.alpha, 0.9999, epsilon = 1e-12);
        assert_relative_eq!(fit.params.beta, 0.0001, epsilon = 1e-12);
        assert_relative_eq!(fit.params.gamma, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn initial_state_seasonals_are_normalized() {
        let values = make_seasonal_data(24, 1.0, 10.0);
        let add = HoltWinters::initial_state(&values, 12, SeasonalityMode::Additive);
        assert_relative_eq!(add.seasonals.iter().sum::<f64>(), 0.0, epsilon = 1e-9);

        let mult = HoltWinters::initial_state(&values, 12, SeasonalityMode::Multiplicative);
        let mean = mult.seasonals.iter().sum::<f64>() / 12.0;
        assert_relative_eq!(mean, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn vector_packing_round_trips() {
        let state = State {
            level: 3.0,
            trend: 0.5,
            seasonals: vec![1.0, -1.0],
        };
        let params = SmoothingParams {
            alpha: 0.2,
            beta: 0.3,
            gamma: 0.4,
        };
        let (p, s) = State::from_vector(&state.to_vector(params));
        assert_eq!(p, params);
        assert_eq!(s, state);
    }

    #[test]
    fn name_reflects_model() {
        let model = HoltWinters::default();
        assert_eq!(model.name(), "HoltWinters");
        assert_eq!(
            model.name_for(SeasonalityMode::Multiplicative),
            "HoltWinters(multiplicative)"
        );
    }
}
