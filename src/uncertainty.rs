//! Constant-width uncertainty band from in-sample residuals.

use crate::core::RegularSeries;
use crate::models::FitArtifacts;
use crate::utils::sample_std_dev;
use tracing::debug;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Lower and upper bounds around a forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct UncertaintyBand {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Sample standard deviation of the residuals the band was built from.
    pub dispersion: f64,
}

impl UncertaintyBand {
    /// Band of `forecast +/- z * dispersion`, the same width at every step.
    pub fn around(forecast: &[f64], dispersion: f64, z: f64) -> Self {
        let half_width = z * dispersion;
        Self {
            lower: forecast.iter().map(|f| f - half_width).collect(),
            upper: forecast.iter().map(|f| f + half_width).collect(),
            dispersion,
        }
    }

    /// Distance between upper and lower bound.
    pub fn width(&self) -> f64 {
        2.0 * Z_95 * self.dispersion
    }
}

/// Build the 95% band for `fit` from its residuals against `series`.
///
/// Fewer than two residuals leave the dispersion undefined; the band then
/// collapses onto the forecast.
pub fn estimate(series: &RegularSeries, fit: &FitArtifacts) -> UncertaintyBand {
    let residuals = fit.residuals(series);
    let dispersion = match sample_std_dev(&residuals) {
        Some(sd) if sd.is_finite() => sd,
        _ => 0.0,
    };
    debug!(residuals = residuals.len(), dispersion, "residual dispersion");
    UncertaintyBand::around(&fit.forecast, dispersion, Z_95)
}
