//! # fmodeler_models: Option Pricers and Volatility Estimators
//!
//! ## Layer 2 (Models) Role
//!
//! Builds on `fmodeler_core` to provide:
//! - Pricing inputs: `PricingParameters`, `OptionType`, `PricingMethod` (`params`)
//! - Cox-Ross-Rubinstein lattice pricer (`binomial`)
//! - Black-Scholes closed form with vega (`black_scholes`)
//! - Newton-Raphson implied volatility with convergence reporting (`implied_vol`)
//! - Rolling-window historical volatility (`volatility`)
//! - Flat host entry points (`api`)
//!
//! Every model is a pure function of its inputs and can be called from
//! several threads at once. Call and put share one code path per model and
//! branch on [`OptionType`].
//!
//! ## Usage Examples
//!
//! ```rust
//! use fmodeler_models::{price_option, implied_volatility, OptionType, PricingMethod};
//!
//! let method = PricingMethod::BlackScholes;
//! let price = price_option(OptionType::Call, method, 2.0, 8, 0.3, 0.02, 100.0, 105.0)?;
//! let result = implied_volatility(price, OptionType::Call, 2.0, 0.02, 105.0, 100.0)?;
//! assert!((result.into_reliable()? - 0.3).abs() < 1e-6);
//! # Ok::<(), fmodeler_core::types::PricingError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialisation for parameters and results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod api;
pub mod binomial;
pub mod black_scholes;
pub mod implied_vol;
pub mod params;
pub mod volatility;

pub use api::{historical_volatility, implied_volatility, price_option};
pub use binomial::{BinomialInternal, BinomialPricer};
pub use black_scholes::{BSInternal, BlackScholesPricer};
pub use implied_vol::{ImpliedVolConfig, ImpliedVolResult, ImpliedVolatilitySolver, SolverIteration};
pub use params::{OptionType, PricingMethod, PricingParameters};
