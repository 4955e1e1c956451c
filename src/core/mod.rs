//! Core data structures: the input contract, the regular monthly series and
//! the forecast result.

mod forecast;
mod input;
mod time_series;

pub use forecast::ForecastOutput;
pub use input::{ForecastInput, RawSample, SeasonalityMode, DATE_FORMAT, DEFAULT_PERIODS};
pub use time_series::{add_months, month_start, months_between, RegularSeries};
