//! Implied volatility command implementation
//!
//! Recovers the Black-Scholes volatility of an observed option price and,
//! on request, records every Newton iteration.

use std::io::Write;

use fmodeler_models::implied_vol::{ImpliedVolResult, ImpliedVolatilitySolver, SolverIteration};
use fmodeler_models::params::{OptionType, PricingParameters};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::output::{emit, fixed, OutputFormat, Report};
use crate::Result;

/// Result of the implied-vol command
#[derive(Debug, Clone, Serialize)]
pub struct ImpliedVolReport {
    /// Call or put
    pub option_type: OptionType,
    /// Observed option price
    pub market_price: f64,
    /// Solver outcome
    pub result: ImpliedVolResult,
    /// Whether the estimate can be trusted
    pub reliable: bool,
    /// Per-iteration trail, when requested
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub iterations: Vec<SolverIteration>,
}

impl Report for ImpliedVolReport {
    fn title(&self) -> String {
        format!("Implied volatility ({})", self.option_type)
    }

    fn rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Market price".to_string(), fixed(self.market_price, 4)),
            ("Volatility".to_string(), fixed(self.result.volatility, 6)),
            ("Status".to_string(), self.result.status.to_string()),
            ("Iterations".to_string(), self.result.iterations.to_string()),
        ];
        rows.extend(self.iterations.iter().map(|it| {
            (
                format!("Iteration {}", it.iteration),
                format!("σ={:.6} diff={:+.3e} vega={:.4}", it.volatility, it.diff, it.vega),
            )
        }));
        rows
    }
}

/// Run the implied-vol command
///
/// `params.volatility` is ignored. With `require_convergence` set in the
/// configuration a degraded result is returned as an error after the report
/// has been written.
pub fn run<W: Write>(
    params: &PricingParameters,
    market_price: f64,
    config: &CliConfig,
    trace_iterations: bool,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    info!(option_type = %params.option_type, market_price, "Solving for implied volatility");

    let solver = ImpliedVolatilitySolver::new(*params, config.implied_vol_config())?;
    let mut trail = Vec::new();
    let result = solver.solve_with_observer(market_price, |state| {
        if trace_iterations {
            trail.push(*state);
        }
    })?;

    let report = ImpliedVolReport {
        option_type: params.option_type,
        market_price,
        result,
        reliable: result.is_reliable(),
        iterations: trail,
    };
    emit(out, format, &report)?;

    if !report.reliable {
        warn!(status = %result.status, "Implied volatility estimate is degraded");
        if config.implied_vol.require_convergence {
            result.into_reliable()?;
        }
    }
    Ok(())
}
