//! # fmodeler_core: Numerical Foundation for FintechModeler
//!
//! ## Layer 1 (Foundation) Role
//!
//! fmodeler_core is the bottom layer of the workspace, providing:
//! - Combinatorics and integer exponentiation (`math::combinatorics`)
//! - Standard normal distribution functions (`math::distributions`)
//! - Finite-difference derivatives (`math::differentiation`)
//! - A guarded Newton-Raphson root finder with convergence reporting (`math::solvers`)
//! - Sliding-window statistics over a price series (`stats`)
//! - Error types: `PricingError`, `StatisticsError` (`types::error`)
//!
//! ## Dependencies
//!
//! Layer 1 has no dependencies on other fmodeler_* crates:
//! - num-traits: Traits for generic numerical computation
//! - libm: Error function for the normal CDF
//! - thiserror: Error derivation
//! - tracing: Diagnostic events (no subscriber is installed here)
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use fmodeler_core::math::combinatorics::{binomial_coef, int_power};
//! use fmodeler_core::math::distributions::norm_cdf;
//! use fmodeler_core::stats::RollingStatistics;
//!
//! assert_eq!(binomial_coef(8, 3), 56.0);
//! assert_eq!(int_power(2.0_f64, -2), 0.25);
//! assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
//!
//! let mut stats = RollingStatistics::new();
//! stats.set_data_from_slice(&[1.0, 2.0, 3.0, 4.0]);
//! stats.set_rolling_window(1, 2).unwrap();
//! assert_eq!(stats.calculate_rolling_mean().unwrap(), 2.5);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for convergence and error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod stats;
pub mod types;
