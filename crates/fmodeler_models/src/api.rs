//! Flat entry points for host applications.
//!
//! Each function validates its inputs, builds the matching model and returns
//! a plain value or a typed error. Nothing is cached between calls.

use fmodeler_core::types::PricingError;

use crate::binomial::BinomialPricer;
use crate::black_scholes::BlackScholesPricer;
use crate::implied_vol::{ImpliedVolResult, ImpliedVolatilitySolver};
use crate::params::{OptionType, PricingMethod, PricingParameters};
use crate::volatility::{HistoricalVolConfig, HistoricalVolatility, HistoricalVolatilityEstimate};

/// Prices a European option with the selected method.
///
/// `period_number` is ignored by [`PricingMethod::BlackScholes`].
///
/// # Errors
/// - `PricingError::InvalidParameter` for inputs outside their domain
/// - `PricingError::InvalidCalibration` for an ill-conditioned lattice
/// - `PricingError::NumericalInstability` if the lattice expectation overflows
///
/// # Examples
/// ```
/// use fmodeler_models::api::price_option;
/// use fmodeler_models::params::OptionType::{Call, Put};
/// use fmodeler_models::params::PricingMethod::{Binomial, BlackScholes};
///
/// let bs = price_option(Call, BlackScholes, 2.0, 8, 0.3, 0.02, 100.0, 105.0).unwrap();
/// let crr = price_option(Put, Binomial, 2.0, 8, 0.3, 0.02, 100.0, 105.0).unwrap();
/// assert_eq!((bs * 100.0).round() / 100.0, 16.44);
/// assert_eq!((crr * 100.0).round() / 100.0, 17.35);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn price_option(
    option_type: OptionType,
    method: PricingMethod,
    expiry_time: f64,
    period_number: u32,
    volatility: f64,
    continuous_rf_rate: f64,
    initial_share_price: f64,
    strike_price: f64,
) -> Result<f64, PricingError> {
    let params = PricingParameters::new(
        option_type,
        expiry_time,
        period_number,
        volatility,
        continuous_rf_rate,
        initial_share_price,
        strike_price,
    );
    price(&params, method)
}

/// Prices a parameter bundle with the selected method.
///
/// # Errors
/// See [`price_option`].
pub fn price(params: &PricingParameters, method: PricingMethod) -> Result<f64, PricingError> {
    match method {
        PricingMethod::Binomial => BinomialPricer::new(*params)?.price(),
        PricingMethod::BlackScholes => {
            Ok(BlackScholesPricer::new(*params)?.calculate_initial_price())
        }
    }
}

/// Recovers the Black-Scholes volatility reproducing `market_price`.
///
/// Degraded outcomes are returned with their status rather than as errors;
/// use [`ImpliedVolResult::into_reliable`] to reject them.
///
/// # Errors
/// `PricingError::InvalidParameter` for inputs outside their domain.
///
/// # Examples
/// ```
/// use fmodeler_models::api::implied_volatility;
/// use fmodeler_models::params::OptionType::Call;
///
/// let result = implied_volatility(30.95, Call, 0.5, 0.0427, 210.0, 227.5).unwrap();
/// assert_eq!((result.into_reliable().unwrap() * 100.0).round() / 100.0, 0.29);
/// ```
pub fn implied_volatility(
    market_price: f64,
    option_type: OptionType,
    expiry_time: f64,
    continuous_rf_rate: f64,
    strike_price: f64,
    initial_share_price: f64,
) -> Result<ImpliedVolResult, PricingError> {
    let params = PricingParameters::new(
        option_type,
        expiry_time,
        1,
        0.0,
        continuous_rf_rate,
        initial_share_price,
        strike_price,
    );
    ImpliedVolatilitySolver::with_defaults(params)?.solve(market_price)
}

/// Estimates annualised historical volatility with a `window_size` scan.
///
/// # Errors
/// - `PricingError::Statistics` for a zero window, a series no longer than
///   one window, or an unusable reference price
///
/// # Examples
/// ```
/// use fmodeler_models::api::historical_volatility;
///
/// let prices: Vec<f64> = (0..40).map(|i| 100.0 * 1.01_f64.powi(i % 4)).collect();
/// let estimate = historical_volatility(&prices, 20).unwrap();
/// assert_eq!(estimate.per_index.len(), 40);
/// assert!(estimate.mean_volatility > 0.0);
/// ```
pub fn historical_volatility(
    prices: &[f64],
    window_size: usize,
) -> Result<HistoricalVolatilityEstimate, PricingError> {
    let estimator = HistoricalVolatility::new(HistoricalVolConfig::with_window_size(window_size))?;
    Ok(estimator.estimate(prices)?)
}
