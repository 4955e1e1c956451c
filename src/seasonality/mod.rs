//! Seasonal decomposition.
//!
//! A [`Decomposer`] splits a regular series into trend and seasonal parts.
//! [`decompose_or_fallback`] never fails: infeasible decompositions degrade to
//! trend = the input values and seasonal = zeros.

mod classical;

pub use classical::ClassicalDecomposition;

use crate::core::{RegularSeries, SeasonalityMode};
use crate::error::Result;
use tracing::warn;

/// Trend and seasonal components aligned one-to-one with the history.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    /// Whether the degenerate fallback produced this decomposition.
    pub fallback: bool,
}

impl Decomposition {
    /// The fallback decomposition: trend is the series itself, no seasonality.
    pub fn passthrough(series: &RegularSeries) -> Self {
        Self {
            trend: series.values().to_vec(),
            seasonal: vec![0.0; series.len()],
            fallback: true,
        }
    }
}

/// A seasonal decomposition strategy.
pub trait Decomposer {
    fn decompose(&self, series: &RegularSeries, mode: SeasonalityMode) -> Result<Decomposition>;

    /// Get the decomposer name.
    fn name(&self) -> &str;
}

impl<D: Decomposer + ?Sized> Decomposer for Box<D> {
    fn decompose(&self, series: &RegularSeries, mode: SeasonalityMode) -> Result<Decomposition> {
        (**self).decompose(series, mode)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Decompose, substituting [`Decomposition::passthrough`] on any failure.
pub fn decompose_or_fallback<D: Decomposer + ?Sized>(
    decomposer: &D,
    series: &RegularSeries,
    mode: SeasonalityMode,
) -> Decomposition {
    match decomposer.decompose(series, mode) {
        Ok(decomposition) => decomposition,
        Err(err) => {
            warn!(
                decomposer = decomposer.name(),
                mode = mode.as_str(),
                error = %err,
                "decomposition infeasible, using trend-only fallback"
            );
            Decomposition::passthrough(series)
        }
    }
}
