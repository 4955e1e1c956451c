//! Two-attempt fitting: the requested seasonal mode, then additive.

use crate::core::{RegularSeries, SeasonalityMode};
use crate::error::{ForecastError, Result};
use crate::models::{FitArtifacts, ModelConfig, SeasonalModel};
use tracing::{debug, warn};

/// Outcome of a single fit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    Fitted(FitArtifacts),
    Failed(ForecastError),
}

impl FitOutcome {
    /// Run one fit attempt and tag its result.
    ///
    /// Artifacts whose lengths disagree with the history or the horizon
    /// count as a failed attempt.
    pub fn attempt<M: SeasonalModel + ?Sized>(
        model: &M,
        series: &RegularSeries,
        config: &ModelConfig,
    ) -> Self {
        match model
            .fit(series, config)
            .and_then(|artifacts| check_shape(artifacts, series, config))
        {
            Ok(artifacts) => Self::Fitted(artifacts),
            Err(err) => Self::Failed(err),
        }
    }
}

fn check_shape(
    artifacts: FitArtifacts,
    series: &RegularSeries,
    config: &ModelConfig,
) -> Result<FitArtifacts> {
    let lengths = [
        ("fitted", artifacts.fitted.len(), series.len()),
        ("forecast", artifacts.forecast.len(), config.horizon),
        (
            "forecast timestamps",
            artifacts.forecast_timestamps.len(),
            config.horizon,
        ),
    ];
    for (what, got, expected) in lengths {
        if got != expected {
            return Err(ForecastError::ComputationError(format!(
                "{what}: expected {expected} values, got {got}"
            )));
        }
    }
    Ok(artifacts)
}

/// Fit under the requested mode, retrying once with additive seasonality if
/// a multiplicative attempt fails.
///
/// The returned artifacts record the mode actually used. A failed additive
/// attempt is irrecoverable and comes back as [`ForecastError::ModelFit`].
pub fn fit_with_fallback<M: SeasonalModel + ?Sized>(
    model: &M,
    series: &RegularSeries,
    config: &ModelConfig,
) -> Result<FitArtifacts> {
    let first = FitOutcome::attempt(model, series, config);
    let err = match first {
        FitOutcome::Fitted(artifacts) => {
            debug!(model = model.name(), mode = config.seasonal_mode.as_str(), "fit succeeded");
            return Ok(artifacts);
        }
        FitOutcome::Failed(err) => err,
    };

    if config.seasonal_mode == SeasonalityMode::Additive {
        return Err(ForecastError::ModelFit(err.to_string()));
    }

    warn!(
        model = model.name(),
        error = %err,
        "multiplicative fit failed, retrying with additive seasonality"
    );
    let additive = config.with_mode(SeasonalityMode::Additive);
    match FitOutcome::attempt(model, series, &additive) {
        FitOutcome::Fitted(artifacts) => Ok(artifacts),
        FitOutcome::Failed(err) => Err(ForecastError::ModelFit(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::add_months;
    use crate::models::SmoothingParams;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    /// Fails for the listed modes and records every attempt.
    struct Scripted {
        fails_on: Vec<SeasonalityMode>,
        attempts: RefCell<Vec<SeasonalityMode>>,
        /// Forecast points to drop from the end, per successful fit.
        truncate: usize,
    }

    impl Scripted {
        fn failing(fails_on: Vec<SeasonalityMode>) -> Self {
            Self {
                fails_on,
                attempts: RefCell::new(Vec::new()),
                truncate: 0,
            }
        }

        fn short_forecast(truncate: usize) -> Self {
            Self {
                truncate,
                ..Self::failing(vec![])
            }
        }
    }

    impl SeasonalModel for Scripted {
        fn fit(&self, series: &RegularSeries, config: &ModelConfig) -> Result<FitArtifacts> {
            self.attempts.borrow_mut().push(config.seasonal_mode);
            if self.fails_on.contains(&config.seasonal_mode) {
                return Err(ForecastError::ComputationError("scripted".to_string()));
            }
            Ok(FitArtifacts {
                fitted: series.values().to_vec(),
                forecast: vec![0.0; config.horizon.saturating_sub(self.truncate)],
                forecast_timestamps: series.future_timestamps(config.horizon)?,
                mode: config.seasonal_mode,
                params: SmoothingParams::default(),
            })
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    fn series() -> RegularSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let ts = (0..4).map(|i| add_months(start, i).unwrap()).collect();
        RegularSeries::new(ts, vec![1.0, 0.0, 2.0, 3.0]).unwrap()
    }

    #[test]
    fn first_success_is_returned() {
        let model = Scripted::failing(vec![]);
        let config = ModelConfig::new(SeasonalityMode::Multiplicative, 3);
        let artifacts = fit_with_fallback(&model, &series(), &config).unwrap();

        assert_eq!(artifacts.mode, SeasonalityMode::Multiplicative);
        assert_eq!(*model.attempts.borrow(), vec![SeasonalityMode::Multiplicative]);
    }

    #[test]
    fn multiplicative_failure_falls_back_to_additive() {
        let model = Scripted::failing(vec![SeasonalityMode::Multiplicative]);
        let config = ModelConfig::new(SeasonalityMode::Multiplicative, 3);
        let artifacts = fit_with_fallback(&model, &series(), &config).unwrap();

        assert_eq!(artifacts.mode, SeasonalityMode::Additive);
        assert_eq!(artifacts.forecast.len(), 3);
        assert_eq!(
            *model.attempts.borrow(),
            vec![SeasonalityMode::Multiplicative, SeasonalityMode::Additive]
        );
    }

    #[test]
    fn additive_failure_is_fatal_without_retry() {
        let model = Scripted::failing(vec![SeasonalityMode::Additive]);
        let config = ModelConfig::new(SeasonalityMode::Additive, 3);
        let err = fit_with_fallback(&model, &series(), &config).unwrap_err();

        assert!(matches!(err, ForecastError::ModelFit(_)));
        assert_eq!(model.attempts.borrow().len(), 1);
    }

    #[test]
    fn both_modes_failing_is_fatal() {
        let model = Scripted::failing(vec![
            SeasonalityMode::Multiplicative,
            SeasonalityMode::Additive,
        ]);
        let config = ModelConfig::new(SeasonalityMode::Multiplicative, 3);
        let err = fit_with_fallback(&model, &series(), &config).unwrap_err();

        assert!(matches!(err, ForecastError::ModelFit(_)));
        assert_eq!(model.attempts.borrow().len(), 2);
    }

    #[test]
    fn wrong_forecast_length_is_a_fit_failure() {
        let model = Scripted::short_forecast(1);
        let err = fit_with_fallback(
            &model,
            &series(),
            &ModelConfig::new(SeasonalityMode::Multiplicative, 3),
        )
        .unwrap_err();

        assert!(matches!(err, ForecastError::ModelFit(ref msg) if msg.contains("forecast")));
        assert_eq!(model.attempts.borrow().len(), 2);
    }

    #[test]
    fn attempt_tags_outcome() {
        let ok = FitOutcome::attempt(
            &Scripted::failing(vec![]),
            &series(),
            &ModelConfig::new(SeasonalityMode::Additive, 1),
        );
        assert!(matches!(ok, FitOutcome::Fitted(_)));

        let failed = FitOutcome::attempt(
            &Scripted::failing(vec![SeasonalityMode::Additive]),
            &series(),
            &ModelConfig::new(SeasonalityMode::Additive, 1),
        );
        assert!(matches!(failed, FitOutcome::Failed(_)));
    }
}
