//! # revenue-forecast
//!
//! Monthly revenue forecasting with Holt-Winters exponential smoothing.
//!
//! One call turns irregular (date, value) samples into a regular monthly
//! series, fits an additive-trend Holt-Winters model with additive or
//! multiplicative annual seasonality, and returns the forecast with a
//! constant-width 95% band plus a classical trend/seasonal decomposition of
//! the history. Infeasible multiplicative fits and decompositions degrade
//! gracefully instead of failing.
//!
//! ```no_run
//! use revenue_forecast::prelude::*;
//!
//! let input = ForecastInput::new(
//!     vec!["2024-01-01".into(), "2024-02-01".into(), "2024-03-01".into()],
//!     vec![100.0, 110.0, 105.0],
//!     SeasonalityMode::Additive,
//! )
//! .with_periods(6);
//! let output = ForecastEngine::new().run(&input)?;
//! assert_eq!(output.forecast_values.len(), 6);
//! # Ok::<(), ForecastError>(())
//! ```

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod scenario;
pub mod seasonality;
pub mod transform;
pub mod uncertainty;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{ForecastInput, ForecastOutput, SeasonalityMode};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{HoltWinters, SeasonalModel};
    pub use crate::pipeline::{EngineConfig, ForecastEngine, ForecastReport};
    pub use crate::scenario::Scenario;
    pub use crate::seasonality::{ClassicalDecomposition, Decomposer};
}
