//! Forecast a year of synthetic monthly revenue and print the result.
//!
//! Run with `RUST_LOG=revenue_forecast=debug` to see the pipeline stages.

use revenue_forecast::io::synthetic_revenue;
use revenue_forecast::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("revenue_forecast=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (dates, values) = synthetic_revenue(42)?;
    let input =
        ForecastInput::new(dates, values, SeasonalityMode::Multiplicative).with_periods(12);

    let report = ForecastEngine::new().run_detailed(&input)?;
    println!(
        "mode used: {}, alpha={:.3} beta={:.3} gamma={:.3}, residual sd={:.1}",
        report.mode_used.as_str(),
        report.params.alpha,
        report.params.beta,
        report.params.gamma,
        report.dispersion
    );

    for scenario in Scenario::ALL {
        let output = report.output.with_scenario(scenario);
        let total: f64 = output.forecast_values.iter().sum();
        println!("{scenario:>12}: next-year revenue {total:.0}");
    }

    println!("{}", serde_json::to_string_pretty(&report.output)?);
    Ok(())
}
