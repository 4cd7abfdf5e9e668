//! Mathematical primitives for option pricing.
//!
//! This module provides:
//! - `combinatorics`: Factorials, binomial coefficients, integer exponentiation
//! - `distributions`: Standard normal CDF and PDF
//! - `differentiation`: Forward-difference derivative estimates
//! - `solvers`: Newton-Raphson root finding with convergence reporting

pub mod combinatorics;
pub mod differentiation;
pub mod distributions;
pub mod solvers;
