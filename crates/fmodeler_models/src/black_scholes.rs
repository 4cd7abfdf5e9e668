//! Black-Scholes closed-form pricer for European options.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//! **Vega**: ν = S·n(d₁)·√T
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! At σ = 0 the option is worth its discounted-forward intrinsic value and
//! d₁ = d₂ = ±∞ by the sign of ln(S/K) + rT.

use fmodeler_core::math::distributions::{norm_cdf, norm_pdf};
use fmodeler_core::math::solvers::{find_newton_root, RootResult};
use fmodeler_core::types::PricingError;
use tracing::debug;

use crate::params::{positive, validate_volatility, OptionType, PricingParameters};

/// Initial volatility of the finite-difference implied-volatility search.
pub const FINITE_DIFFERENCE_GUESS: f64 = 0.1;

/// Price tolerance of the finite-difference implied-volatility search.
pub const FINITE_DIFFERENCE_TOLERANCE: f64 = 1e-8;

/// The d₁/d₂ pair for one volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSInternal {
    /// d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
    pub d1: f64,
    /// d₂ = d₁ - σ√T
    pub d2: f64,
}

impl BSInternal {
    /// Computes d₁ and d₂ for the given parameters and volatility.
    ///
    /// `params.volatility` is ignored in favour of `volatility`, which lets a
    /// root search probe many volatilities against one parameter bundle.
    pub fn compute(params: &PricingParameters, volatility: f64) -> Self {
        let t = params.expiry_time;
        let vol_sqrt_t = volatility * t.sqrt();
        let forward_moneyness = (params.initial_share_price / params.strike_price).ln()
            + params.continuous_rf_rate * t;

        if vol_sqrt_t == 0.0 {
            let limit = if forward_moneyness > 0.0 {
                f64::INFINITY
            } else if forward_moneyness < 0.0 {
                f64::NEG_INFINITY
            } else {
                0.0
            };
            return Self {
                d1: limit,
                d2: limit,
            };
        }

        let d1 = (forward_moneyness + 0.5 * volatility * volatility * t) / vol_sqrt_t;
        Self {
            d1,
            d2: d1 - vol_sqrt_t,
        }
    }

    /// Option price under these internals.
    pub fn price(&self, params: &PricingParameters) -> f64 {
        let s = params.initial_share_price;
        let discounted_strike =
            params.strike_price * (-params.continuous_rf_rate * params.expiry_time).exp();

        match params.option_type {
            OptionType::Call => s * norm_cdf(self.d1) - discounted_strike * norm_cdf(self.d2),
            OptionType::Put => discounted_strike * norm_cdf(-self.d2) - s * norm_cdf(-self.d1),
        }
    }

    /// Vega under these internals, identical for calls and puts.
    pub fn vega(&self, params: &PricingParameters) -> f64 {
        norm_pdf(self.d1) * params.initial_share_price * params.expiry_time.sqrt()
    }
}

/// Black-Scholes pricer holding internals for its current volatility.
///
/// Changing the volatility through [`set_volatility`](Self::set_volatility)
/// recomputes d₁/d₂ immediately, so pricing never sees stale internals.
///
/// # Examples
/// ```
/// use fmodeler_models::black_scholes::BlackScholesPricer;
/// use fmodeler_models::params::{OptionType, PricingParameters};
///
/// let params = PricingParameters::new(OptionType::Call, 2.0, 8, 0.3, 0.02, 100.0, 105.0);
/// let mut pricer = BlackScholesPricer::new(params).unwrap();
/// assert!((pricer.calculate_initial_price() - 16.44).abs() < 5e-3);
///
/// // Price is increasing in volatility
/// let before = pricer.calculate_initial_price();
/// pricer.set_volatility(0.4).unwrap();
/// assert!(pricer.calculate_initial_price() > before);
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholesPricer {
    params: PricingParameters,
    internal: BSInternal,
}

impl BlackScholesPricer {
    /// Creates a pricer after validating the parameters.
    ///
    /// `period_number` is not used and not validated.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` for inputs outside their domain.
    pub fn new(params: PricingParameters) -> Result<Self, PricingError> {
        params.validate()?;
        let internal = BSInternal::compute(&params, params.volatility);
        Ok(Self { params, internal })
    }

    /// Returns the pricing parameters.
    #[inline]
    pub fn params(&self) -> &PricingParameters {
        &self.params
    }

    /// Returns the current volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.params.volatility
    }

    /// Returns the current d₁/d₂ pair.
    #[inline]
    pub fn internal(&self) -> &BSInternal {
        &self.internal
    }

    /// Returns d₁ at the current volatility.
    #[inline]
    pub fn d1(&self) -> f64 {
        self.internal.d1
    }

    /// Returns d₂ at the current volatility.
    #[inline]
    pub fn d2(&self) -> f64 {
        self.internal.d2
    }

    /// Replaces the volatility and recomputes d₁/d₂.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if `volatility` is negative or
    /// non-finite; the pricer is left unchanged.
    pub fn set_volatility(&mut self, volatility: f64) -> Result<(), PricingError> {
        validate_volatility(volatility)?;
        self.params.volatility = volatility;
        self.update_internal_parameters();
        Ok(())
    }

    fn update_internal_parameters(&mut self) {
        self.internal = BSInternal::compute(&self.params, self.params.volatility);
    }

    /// Option price at the current volatility.
    pub fn calculate_initial_price(&self) -> f64 {
        let price = self.internal.price(&self.params);
        debug!(
            option_type = %self.params.option_type,
            volatility = self.params.volatility,
            d1 = self.internal.d1,
            d2 = self.internal.d2,
            price,
            "Black-Scholes price"
        );
        price
    }

    /// Vega at the current volatility.
    pub fn calculate_vega_greek(&self) -> f64 {
        self.internal.vega(&self.params)
    }

    /// Implied volatility via the generic Newton search with a
    /// forward-difference derivative.
    ///
    /// Starts from [`FINITE_DIFFERENCE_GUESS`] and stops once the price error
    /// falls below [`FINITE_DIFFERENCE_TOLERANCE`]. Prefer
    /// [`ImpliedVolatilitySolver`](crate::implied_vol::ImpliedVolatilitySolver),
    /// which uses the analytic vega and keeps σ in a safe range.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if `market_price` is not positive
    /// and finite. Non-convergence is reported through the result status.
    pub fn implied_volatility_finite_difference(
        &self,
        market_price: f64,
    ) -> Result<RootResult<f64>, PricingError> {
        positive("market_price", market_price)?;
        let params = self.params;
        let objective =
            |volatility: f64| {
                BSInternal::compute(&params, volatility).price(&params) - market_price
            };
        Ok(find_newton_root(
            objective,
            FINITE_DIFFERENCE_GUESS,
            FINITE_DIFFERENCE_TOLERANCE,
        ))
    }
}
