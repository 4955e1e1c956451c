//! Exponential smoothing models.
//!
//! Holt-Winters with an additive trend and additive or multiplicative
//! seasonality, with initial states estimated from the data.

mod holt_winters;

pub use holt_winters::HoltWinters;
