//! Finite-difference derivative estimates.

use num_traits::Float;

/// Default forward-difference step.
pub const DEFAULT_STEP: f64 = 1e-5;

/// Forward-difference estimate of `f'(x)`.
///
/// Computes `(f(x + dx) - f(x)) / dx`. The truncation error is `O(dx)`.
///
/// # Examples
/// ```
/// use fmodeler_core::math::differentiation::differentiate;
///
/// let slope = differentiate(|x: f64| x * x, 3.0, 1e-6);
/// assert!((slope - 6.0).abs() < 1e-5);
/// ```
#[inline]
pub fn differentiate<T, F>(f: F, x: T, dx: T) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    (f(x + dx) - f(x)) / dx
}

/// Forward-difference estimate using [`DEFAULT_STEP`].
#[inline]
pub fn differentiate_default<F>(f: F, x: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    differentiate(f, x, DEFAULT_STEP)
}
