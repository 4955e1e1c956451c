//! What-if scenarios applied to a finished forecast.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A uniform scaling of the forecast and its band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[default]
    Base,
    Optimistic,
    Pessimistic,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Base, Scenario::Optimistic, Scenario::Pessimistic];

    /// Factor applied to forecast values and bounds.
    pub fn multiplier(self) -> f64 {
        match self {
            Scenario::Base => 1.0,
            Scenario::Optimistic => 1.10,
            Scenario::Pessimistic => 0.85,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Base => "base",
            Scenario::Optimistic => "optimistic",
            Scenario::Pessimistic => "pessimistic",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(Scenario::Base),
            "optimistic" => Ok(Scenario::Optimistic),
            "pessimistic" => Ok(Scenario::Pessimistic),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown scenario '{other}'"
            ))),
        }
    }
}
