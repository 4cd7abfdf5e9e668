//! Implied volatility by guarded Newton-Raphson on the Black-Scholes price.
//!
//! ## Algorithm
//!
//! 1. Initial guess: Brenner-Subrahmanyam, σ₀ = √(2π/T) · C/S, falling back
//!    to 0.20 when non-finite or below 0.001
//! 2. Each iteration recomputes d₁/d₂ at σ and evaluates the price error and
//!    vega
//! 3. σ_next = σ - (price - C)/vega, halving σ instead when σ_next ≤ 0 and
//!    clamping to the volatility ceiling
//!
//! Every exit carries a [`ConvergenceStatus`]; only `Converged` and
//! `StepConverged` are reliable.

use std::f64::consts::PI;

use fmodeler_core::math::solvers::ConvergenceStatus;
use fmodeler_core::types::PricingError;
use tracing::{trace, warn};

use crate::black_scholes::BSInternal;
use crate::params::{positive, PricingParameters};

/// Configuration for the implied-volatility search.
///
/// # Examples
/// ```
/// use fmodeler_models::implied_vol::ImpliedVolConfig;
///
/// let config = ImpliedVolConfig::default()
///     .with_max_iterations(50)
///     .with_initial_guess(0.25);
/// assert_eq!(config.max_iterations, 50);
/// assert_eq!(config.initial_guess, Some(0.25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolConfig {
    /// Maximum number of Newton iterations.
    pub max_iterations: usize,
    /// Converged when `|price(σ) - market_price|` falls below this.
    pub price_tolerance: f64,
    /// Step-converged when `|σ_next - σ|` falls below this.
    pub step_tolerance: f64,
    /// Vega below this stalls the search.
    pub min_vega: f64,
    /// Ceiling applied to every iterate.
    pub max_volatility: f64,
    /// Brenner-Subrahmanyam guesses below this are replaced by `fallback_guess`.
    pub min_initial_guess: f64,
    /// Starting volatility when the approximation is unusable.
    pub fallback_guess: f64,
    /// Caller-supplied starting volatility, bypassing the approximation.
    pub initial_guess: Option<f64>,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            price_tolerance: 1e-8,
            step_tolerance: 1e-8,
            min_vega: 1e-10,
            max_volatility: 5.0,
            min_initial_guess: 0.001,
            fallback_guess: 0.20,
            initial_guess: None,
        }
    }
}

impl ImpliedVolConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the price tolerance.
    #[must_use]
    pub fn with_price_tolerance(mut self, price_tolerance: f64) -> Self {
        self.price_tolerance = price_tolerance;
        self
    }

    /// Sets the step tolerance.
    #[must_use]
    pub fn with_step_tolerance(mut self, step_tolerance: f64) -> Self {
        self.step_tolerance = step_tolerance;
        self
    }

    /// Sets the vega floor.
    #[must_use]
    pub fn with_min_vega(mut self, min_vega: f64) -> Self {
        self.min_vega = min_vega;
        self
    }

    /// Sets the volatility ceiling.
    #[must_use]
    pub fn with_max_volatility(mut self, max_volatility: f64) -> Self {
        self.max_volatility = max_volatility;
        self
    }

    /// Starts the search from `initial_guess`.
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = Some(initial_guess);
        self
    }

    /// Checks that tolerances and bounds are usable.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.max_iterations == 0 {
            return Err(PricingError::invalid_parameter(
                "max_iterations",
                0.0,
                "must be at least 1",
            ));
        }
        positive("price_tolerance", self.price_tolerance)?;
        positive("step_tolerance", self.step_tolerance)?;
        positive("min_vega", self.min_vega)?;
        positive("max_volatility", self.max_volatility)?;
        positive("fallback_guess", self.fallback_guess)?;
        if let Some(guess) = self.initial_guess {
            positive("initial_guess", guess)?;
        }
        Ok(())
    }
}

/// State of one Newton iteration, passed to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverIteration {
    /// Zero-based iteration index
    pub iteration: usize,
    /// Volatility evaluated in this iteration
    pub volatility: f64,
    /// Black-Scholes price at `volatility`
    pub price: f64,
    /// `price - market_price`
    pub diff: f64,
    /// Vega at `volatility`
    pub vega: f64,
}

/// Outcome of an implied-volatility search.
///
/// Newton iterates are clamped to the configured `max_volatility`; a result
/// whose `volatility` equals that ceiling is a capped estimate, even when the
/// status reports step convergence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolResult {
    /// Volatility estimate (best available for degraded outcomes, capped at
    /// `max_volatility`)
    pub volatility: f64,
    /// Newton steps taken
    pub iterations: usize,
    /// Terminal state
    pub status: ConvergenceStatus,
}

impl ImpliedVolResult {
    /// Returns whether the estimate should be trusted.
    #[inline]
    pub fn is_reliable(&self) -> bool {
        self.status.is_reliable()
    }

    /// Returns the volatility, or an error for degraded outcomes.
    ///
    /// # Errors
    /// `PricingError::NotConverged` unless the status is reliable.
    pub fn into_reliable(self) -> Result<f64, PricingError> {
        if self.is_reliable() {
            Ok(self.volatility)
        } else {
            Err(PricingError::NotConverged {
                status: self.status,
                volatility: self.volatility,
                iterations: self.iterations,
            })
        }
    }
}

/// Newton-Raphson implied-volatility solver over one parameter bundle.
///
/// The `volatility` field of the parameters is ignored; every iteration
/// re-derives d₁/d₂ at the current estimate.
///
/// # Examples
/// ```
/// use fmodeler_models::implied_vol::ImpliedVolatilitySolver;
/// use fmodeler_models::params::{OptionType, PricingParameters};
///
/// let params = PricingParameters::new(OptionType::Call, 0.5, 1, 0.0, 0.0427, 227.5, 210.0);
/// let solver = ImpliedVolatilitySolver::with_defaults(params).unwrap();
/// let result = solver.solve(30.95).unwrap();
///
/// assert!(result.is_reliable());
/// assert!((result.volatility - 0.29).abs() < 5e-3);
/// ```
#[derive(Debug, Clone)]
pub struct ImpliedVolatilitySolver {
    params: PricingParameters,
    config: ImpliedVolConfig,
}

impl ImpliedVolatilitySolver {
    /// Creates a solver.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` for invalid contract parameters or
    /// configuration.
    pub fn new(params: PricingParameters, config: ImpliedVolConfig) -> Result<Self, PricingError> {
        // Only the volatility-independent inputs matter here.
        params.with_volatility(0.0).validate()?;
        config.validate()?;
        Ok(Self { params, config })
    }

    /// Creates a solver with the default configuration.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn with_defaults(params: PricingParameters) -> Result<Self, PricingError> {
        Self::new(params, ImpliedVolConfig::default())
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &ImpliedVolConfig {
        &self.config
    }

    /// Returns the contract parameters.
    pub fn params(&self) -> &PricingParameters {
        &self.params
    }

    /// Starting volatility for `market_price`.
    pub fn initial_guess(&self, market_price: f64) -> f64 {
        if let Some(guess) = self.config.initial_guess {
            return guess;
        }
        let guess = (2.0 * PI / self.params.expiry_time).sqrt()
            * (market_price / self.params.initial_share_price);
        if guess.is_finite() && guess >= self.config.min_initial_guess {
            guess
        } else {
            self.config.fallback_guess
        }
    }

    /// Solves for the volatility reproducing `market_price`.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if `market_price` is not positive and
    /// finite. Non-convergence is reported through the result status.
    pub fn solve(&self, market_price: f64) -> Result<ImpliedVolResult, PricingError> {
        self.solve_with_observer(market_price, |_| {})
    }

    /// Solves for the volatility, calling `observer` once per iteration.
    ///
    /// # Errors
    /// See [`solve`](Self::solve).
    pub fn solve_with_observer<F>(
        &self,
        market_price: f64,
        mut observer: F,
    ) -> Result<ImpliedVolResult, PricingError>
    where
        F: FnMut(&SolverIteration),
    {
        positive("market_price", market_price)?;

        let config = &self.config;
        let mut volatility = self.initial_guess(market_price);

        for iteration in 0..config.max_iterations {
            let internal = BSInternal::compute(&self.params, volatility);
            let price = internal.price(&self.params);
            let diff = price - market_price;
            let vega = internal.vega(&self.params);

            let state = SolverIteration {
                iteration,
                volatility,
                price,
                diff,
                vega,
            };
            trace!(iteration, volatility, price, diff, vega, "Implied volatility iteration");
            observer(&state);

            if diff.abs() < config.price_tolerance {
                return Ok(self.finish(volatility, iteration, ConvergenceStatus::Converged));
            }

            if vega.is_nan() || vega.abs() < config.min_vega {
                return Ok(self.finish(volatility, iteration, ConvergenceStatus::StalledDerivative));
            }

            let mut next = volatility - diff / vega;
            if next.is_nan() || next <= 0.0 {
                next = volatility * 0.5;
            } else if next > config.max_volatility {
                next = config.max_volatility;
            }

            if (next - volatility).abs() < config.step_tolerance {
                return Ok(self.finish(next, iteration + 1, ConvergenceStatus::StepConverged));
            }

            volatility = next;
        }

        Ok(self.finish(
            volatility,
            config.max_iterations,
            ConvergenceStatus::IterationsExhausted,
        ))
    }

    fn finish(
        &self,
        volatility: f64,
        iterations: usize,
        status: ConvergenceStatus,
    ) -> ImpliedVolResult {
        if !status.is_reliable() {
            warn!(
                %status,
                volatility,
                iterations,
                option_type = %self.params.option_type,
                "Implied volatility search degraded"
            );
        }
        ImpliedVolResult {
            volatility,
            iterations,
            status,
        }
    }
}
