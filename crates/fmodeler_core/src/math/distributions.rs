//! Standard normal distribution functions.
//!
//! This module provides:
//! - `norm_cdf`: Cumulative distribution function, N(z)
//! - `norm_pdf`: Probability density function, n(z)
//!
//! The CDF is expressed through the error function, `0.5 * (1 + erf(z / √2))`,
//! using `libm::erf` for full double precision.

use std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= z) where X ~ N(0, 1).
///
/// # Examples
/// ```
/// use fmodeler_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!(norm_cdf(-3.0) < 0.01);
/// assert!(norm_cdf(3.0) > 0.99);
/// ```
#[inline]
pub fn norm_cdf(z: f64) -> f64 {
    0.5 * (1.0 + libm::erf(z / SQRT_2))
}

/// Standard normal probability density function.
///
/// φ(z) = exp(-z² / 2) / sqrt(2π)
///
/// # Examples
/// ```
/// use fmodeler_core::math::distributions::norm_pdf;
///
/// assert!((norm_pdf(0.0) - 0.3989422804).abs() < 1e-9);
/// ```
#[inline]
pub fn norm_pdf(z: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * z * z).exp()
}
