//! Series transformations: regularization onto a monthly grid and
//! moving-window filters.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use revenue_forecast::core::RawSample;
//! use revenue_forecast::transform::regularize;
//!
//! let samples = vec![
//!     RawSample::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 30.0),
//!     RawSample::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 10.0),
//! ];
//! let series = regularize(&samples).unwrap();
//! assert_eq!(series.values(), &[10.0, 20.0, 30.0]);
//! ```

pub mod regularize;
pub mod window;

pub use regularize::{fill_edges, interpolate_series, regularize};
pub use window::centered_moving_average;
