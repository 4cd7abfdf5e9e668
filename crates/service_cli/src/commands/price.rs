//! Price command implementation
//!
//! Prices a single European option with the binomial lattice or the
//! Black-Scholes closed form.

use std::io::Write;

use fmodeler_models::api;
use fmodeler_models::params::{PricingMethod, PricingParameters};
use serde::Serialize;
use tracing::info;

use crate::output::{emit, fixed, OutputFormat, Report};
use crate::Result;

/// Result of the price command
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    /// Model used
    pub method: PricingMethod,
    /// Contract and market inputs
    pub parameters: PricingParameters,
    /// Option price
    pub price: f64,
}

impl Report for PriceReport {
    fn title(&self) -> String {
        format!("{} {} option", self.method, self.parameters.option_type)
    }

    fn rows(&self) -> Vec<(String, String)> {
        let p = &self.parameters;
        let mut rows = vec![
            ("Spot".to_string(), fixed(p.initial_share_price, 4)),
            ("Strike".to_string(), fixed(p.strike_price, 4)),
            ("Expiry (years)".to_string(), fixed(p.expiry_time, 4)),
            ("Volatility".to_string(), fixed(p.volatility, 4)),
            ("Rate".to_string(), fixed(p.continuous_rf_rate, 4)),
        ];
        if self.method == PricingMethod::Binomial {
            rows.push(("Periods".to_string(), p.period_number.to_string()));
        }
        rows.push(("Price".to_string(), fixed(self.price, 6)));
        rows
    }
}

/// Run the price command
pub fn run<W: Write>(
    params: &PricingParameters,
    method: PricingMethod,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    info!(%method, option_type = %params.option_type, "Pricing option");

    let price = api::price(params, method)?;
    let report = PriceReport {
        method,
        parameters: *params,
        price,
    };
    emit(out, format, &report)
}
