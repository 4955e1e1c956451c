//! Seasonal-trend models and the fitting fallback policy.

mod fallback;
mod traits;

pub mod exponential;

pub use exponential::HoltWinters;
pub use fallback::{fit_with_fallback, FitOutcome};
pub use traits::{
    BoxedModel, FitArtifacts, ModelConfig, SeasonalModel, SmoothingParams, SEASONAL_PERIOD,
};
