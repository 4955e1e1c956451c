//! Error types for the revenue-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while forecasting.
///
/// Only [`ForecastError::Validation`] and [`ForecastError::ModelFit`] escape
/// [`crate::pipeline::ForecastEngine::run`]; the remaining variants are
/// produced by the model and decomposition strategies and absorbed by their
/// fallbacks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Caller input violates the input contract.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending input field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// The model could not be fitted under any seasonal mode.
    #[error("model fit failed: {0}")]
    ModelFit(String),

    /// Uploaded CSV could not be parsed.
    #[error("csv error: {0}")]
    Csv(String),
}

impl ForecastError {
    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the input field at fault, for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}
