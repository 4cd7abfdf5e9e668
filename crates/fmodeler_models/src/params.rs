//! Option contract and market parameters.
//!
//! This module provides:
//! - `OptionType`: Call or put
//! - `PricingMethod`: Binomial lattice or Black-Scholes closed form
//! - `PricingParameters`: The immutable input bundle of a pricing call

use std::fmt;
use std::str::FromStr;

use fmodeler_core::types::PricingError;

/// Option right.
///
/// Both pricers dispatch on this tag with an exhaustive `match`.
///
/// # Examples
/// ```
/// use fmodeler_models::params::OptionType;
///
/// let call: OptionType = "call".parse().unwrap();
/// assert_eq!(call, OptionType::Call);
/// assert_eq!(call.payoff(110.0, 100.0), 10.0);
/// assert_eq!(OptionType::Put.payoff(110.0, 100.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Right to buy at the strike: max(S - K, 0)
    Call,
    /// Right to sell at the strike: max(K - S, 0)
    Put,
}

impl OptionType {
    /// Terminal payoff for a given share price and strike.
    #[inline]
    pub fn payoff(&self, share_price: f64, strike_price: f64) -> f64 {
        match self {
            OptionType::Call => (share_price - strike_price).max(0.0),
            OptionType::Put => (strike_price - share_price).max(0.0),
        }
    }

    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(format!("Unknown option type: {}. Supported: call, put", other)),
        }
    }
}

/// Pricing model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PricingMethod {
    /// Cox-Ross-Rubinstein lattice with `period_number` steps
    Binomial,
    /// Closed-form Black-Scholes; `period_number` is ignored
    BlackScholes,
}

impl PricingMethod {
    /// Kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMethod::Binomial => "binomial",
            PricingMethod::BlackScholes => "black-scholes",
        }
    }
}

impl fmt::Display for PricingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binomial" | "crr" => Ok(PricingMethod::Binomial),
            "black-scholes" | "blackscholes" | "bs" => Ok(PricingMethod::BlackScholes),
            other => Err(format!(
                "Unknown pricing method: {}. Supported: binomial, black-scholes",
                other
            )),
        }
    }
}

/// Inputs of a single pricing call.
///
/// Fields are public and unchecked; each pricer validates the subset it
/// needs before computing anything, so malformed inputs fail fast with
/// `PricingError::InvalidParameter` instead of producing NaN.
///
/// # Examples
/// ```
/// use fmodeler_models::params::{OptionType, PricingParameters};
///
/// let params = PricingParameters::new(OptionType::Call, 2.0, 8, 0.3, 0.02, 100.0, 105.0);
/// assert!(params.validate_lattice().is_ok());
/// assert_eq!(params.period_time(), 0.25);
///
/// let bad = PricingParameters { strike_price: 0.0, ..params };
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingParameters {
    /// Call or put
    pub option_type: OptionType,
    /// Time to expiry in years (T > 0)
    pub expiry_time: f64,
    /// Lattice steps (N >= 1, binomial only)
    pub period_number: u32,
    /// Annualised volatility (σ >= 0)
    pub volatility: f64,
    /// Continuously compounded risk-free rate (r)
    pub continuous_rf_rate: f64,
    /// Spot share price (S0 > 0)
    pub initial_share_price: f64,
    /// Strike price (K > 0)
    pub strike_price: f64,
}

impl PricingParameters {
    /// Creates a parameter bundle.
    pub fn new(
        option_type: OptionType,
        expiry_time: f64,
        period_number: u32,
        volatility: f64,
        continuous_rf_rate: f64,
        initial_share_price: f64,
        strike_price: f64,
    ) -> Self {
        Self {
            option_type,
            expiry_time,
            period_number,
            volatility,
            continuous_rf_rate,
            initial_share_price,
            strike_price,
        }
    }

    /// Returns a copy with a different volatility.
    #[must_use]
    pub fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    /// Returns a copy with a different option type.
    #[must_use]
    pub fn with_option_type(self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..self
        }
    }

    /// Length of one lattice period, `T / N`.
    #[inline]
    pub fn period_time(&self) -> f64 {
        self.expiry_time / f64::from(self.period_number)
    }

    /// Checks the parameters shared by every model.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` when T, S0 or K is not strictly
    /// positive, σ is negative, or any value is non-finite.
    pub fn validate(&self) -> Result<(), PricingError> {
        positive("expiry_time", self.expiry_time)?;
        positive("initial_share_price", self.initial_share_price)?;
        positive("strike_price", self.strike_price)?;
        validate_volatility(self.volatility)?;
        if !self.continuous_rf_rate.is_finite() {
            return Err(PricingError::invalid_parameter(
                "continuous_rf_rate",
                self.continuous_rf_rate,
                "must be finite",
            ));
        }
        Ok(())
    }

    /// Checks the parameters of a lattice model.
    ///
    /// # Errors
    /// Everything [`validate`](Self::validate) rejects, plus `period_number`
    /// outside `1..=i32::MAX`.
    pub fn validate_lattice(&self) -> Result<(), PricingError> {
        self.validate()?;
        if self.period_number < 1 || i32::try_from(self.period_number).is_err() {
            return Err(PricingError::invalid_parameter(
                "period_number",
                f64::from(self.period_number),
                "must be between 1 and i32::MAX",
            ));
        }
        Ok(())
    }
}

/// Checks a volatility input: finite and non-negative.
pub(crate) fn validate_volatility(volatility: f64) -> Result<(), PricingError> {
    if !volatility.is_finite() || volatility < 0.0 {
        return Err(PricingError::invalid_parameter(
            "volatility",
            volatility,
            "must be finite and non-negative",
        ));
    }
    Ok(())
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricingError::invalid_parameter(
            name,
            value,
            "must be finite and positive",
        ));
    }
    Ok(())
}
