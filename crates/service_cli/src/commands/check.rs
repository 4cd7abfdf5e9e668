//! Check command implementation
//!
//! Replays the reference scenarios and compares each result, rounded to two
//! decimals, with its published value.

use std::io::Write;

use fmodeler_models::api;
use fmodeler_models::implied_vol::ImpliedVolResult;
use fmodeler_models::params::{OptionType, PricingMethod};
use serde::Serialize;
use tracing::{error, info};

use crate::output::{emit, fixed, OutputFormat, Report};
use crate::{CliError, Result};

/// Outcome of one reference scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario label
    pub name: &'static str,
    /// Published value
    pub expected: f64,
    /// Computed value before rounding
    pub actual: f64,
    /// Whether the rounded value matches
    pub passed: bool,
}

/// Result of the check command
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Per-scenario outcomes
    pub scenarios: Vec<ScenarioOutcome>,
}

impl CheckReport {
    /// Number of failed scenarios
    pub fn failures(&self) -> usize {
        self.scenarios.iter().filter(|s| !s.passed).count()
    }
}

impl Report for CheckReport {
    fn title(&self) -> String {
        "Self-check".to_string()
    }

    fn rows(&self) -> Vec<(String, String)> {
        self.scenarios
            .iter()
            .map(|s| {
                let verdict = if s.passed { "PASS" } else { "FAIL" };
                (
                    s.name.to_string(),
                    format!(
                        "{} (expected {}) {}",
                        fixed(s.actual, 4),
                        fixed(s.expected, 2),
                        verdict
                    ),
                )
            })
            .collect()
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn outcome(name: &'static str, expected: f64, actual: Result<f64>) -> Result<ScenarioOutcome> {
    let actual = actual?;
    let passed = (round2(actual) - expected).abs() < 1e-9;
    if passed {
        info!(name, actual, "Scenario passed");
    } else {
        error!(name, actual, expected, "Scenario failed");
    }
    Ok(ScenarioOutcome {
        name,
        expected,
        actual,
        passed,
    })
}

/// Runs the three reference scenarios.
pub fn scenarios() -> Result<CheckReport> {
    let a = api::price_option(
        OptionType::Call,
        PricingMethod::BlackScholes,
        2.0,
        8,
        0.3,
        0.02,
        100.0,
        105.0,
    );
    let b = api::price_option(
        OptionType::Put,
        PricingMethod::Binomial,
        2.0,
        8,
        0.3,
        0.02,
        100.0,
        105.0,
    );
    let c = api::implied_volatility(30.95, OptionType::Call, 0.5, 0.0427, 210.0, 227.5)
        .and_then(ImpliedVolResult::into_reliable);

    Ok(CheckReport {
        scenarios: vec![
            outcome("A: Black-Scholes call", 16.44, a.map_err(CliError::from))?,
            outcome("B: binomial put (N=8)", 17.35, b.map_err(CliError::from))?,
            outcome("C: implied volatility", 0.29, c.map_err(CliError::from))?,
        ],
    })
}

/// Run the check command
pub fn run<W: Write>(format: OutputFormat, out: &mut W) -> Result<()> {
    let report = scenarios()?;
    emit(out, format, &report)?;

    let failed = report.failures();
    if failed > 0 {
        return Err(CliError::CheckFailed {
            failed,
            total: report.scenarios.len(),
        });
    }
    Ok(())
}
