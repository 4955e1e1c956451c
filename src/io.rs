//! Data sources feeding the engine: CSV uploads and a synthetic demo series.

use crate::core::{add_months, DATE_FORMAT};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;
use std::f64::consts::PI;
use tracing::debug;

/// Accepted spellings of the date column, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        // Bare year-month, e.g. "2023-04".
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok())
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    cleaned.parse().ok()
}

/// Read uploaded CSV text into date strings and values.
///
/// The first row is a header. The first column holds dates, the second the
/// amounts; further columns are ignored. Dates come back as `YYYY-MM-DD`.
pub fn read_csv(text: &str) -> Result<(Vec<String>, Vec<f64>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = reader.headers()?.len();
    if columns < 2 {
        return Err(ForecastError::Csv(format!(
            "expected a date and a value column, found {columns} column(s)"
        )));
    }

    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = row + 2;
        let (Some(date), Some(amount)) = (record.get(0), record.get(1)) else {
            return Err(ForecastError::Csv(format!("line {line}: missing column")));
        };
        let date = parse_date(date)
            .ok_or_else(|| ForecastError::Csv(format!("line {line}: bad date '{date}'")))?;
        let amount = parse_amount(amount)
            .ok_or_else(|| ForecastError::Csv(format!("line {line}: bad value '{amount}'")))?;
        dates.push(date.format(DATE_FORMAT).to_string());
        values.push(amount);
    }

    debug!(rows = values.len(), "read csv upload");
    Ok((dates, values))
}

/// Months of synthetic history produced by [`synthetic_revenue`].
pub const SYNTHETIC_MONTHS: u32 = 36;

/// Deterministic demo series: 36 months from January 2022 of
/// `10000 + 200 t + 2000 sin(2 pi t / 12)` plus N(0, 200) noise.
pub fn synthetic_revenue(seed: u64) -> Result<(Vec<String>, Vec<f64>)> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1)
        .ok_or_else(|| ForecastError::ComputationError("invalid start date".to_string()))?;
    let noise = Normal::new(0.0, 200.0)
        .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut dates = Vec::with_capacity(SYNTHETIC_MONTHS as usize);
    let mut values = Vec::with_capacity(SYNTHETIC_MONTHS as usize);
    for t in 0..SYNTHETIC_MONTHS {
        let x = t as f64;
        dates.push(add_months(start, t)?.format(DATE_FORMAT).to_string());
        let signal = 10_000.0 + 200.0 * x + 2_000.0 * (2.0 * PI * x / 12.0).sin();
        values.push(signal + rng.sample(noise));
    }
    Ok((dates, values))
}
