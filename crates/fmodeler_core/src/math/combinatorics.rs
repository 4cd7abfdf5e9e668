//! Factorials, binomial coefficients and integer exponentiation.
//!
//! Small arguments use exact integer arithmetic. Beyond [`EXACT_LIMIT`] the
//! values are computed from a log-factorial sum and exponentiated, which keeps
//! lattice weights finite for period counts in the hundreds.

use num_traits::Float;

/// Largest `n` for which factorials and binomial coefficients are exact in `u64`.
pub const EXACT_LIMIT: u32 = 20;

/// Natural logarithm of `n!`.
///
/// # Examples
/// ```
/// use fmodeler_core::math::combinatorics::ln_factorial;
///
/// assert_eq!(ln_factorial(0), 0.0);
/// assert!((ln_factorial(5) - 120.0_f64.ln()).abs() < 1e-12);
/// ```
pub fn ln_factorial(n: u32) -> f64 {
    (2..=n).map(|i| f64::from(i).ln()).sum()
}

/// Table of `ln(i!)` for `i = 0..=n`.
///
/// Built with one running sum, so a lattice of `n` periods can look up every
/// log-binomial coefficient in constant time.
pub fn ln_factorials(n: u32) -> Vec<f64> {
    let mut table = Vec::with_capacity(n as usize + 1);
    let mut acc = 0.0;
    table.push(acc);
    for i in 1..=n {
        acc += f64::from(i).ln();
        table.push(acc);
    }
    table
}

/// Computes `n!`.
///
/// Exact for `n <= 20`; larger arguments go through [`ln_factorial`] and are
/// rounded, overflowing to `f64::INFINITY` past `170!`.
///
/// # Examples
/// ```
/// use fmodeler_core::math::combinatorics::factorial;
///
/// assert_eq!(factorial(0), 1.0);
/// assert_eq!(factorial(5), 120.0);
/// ```
pub fn factorial(n: u32) -> f64 {
    if n <= EXACT_LIMIT {
        return (1..=u64::from(n)).product::<u64>() as f64;
    }
    ln_factorial(n).exp().round()
}

/// Natural logarithm of the binomial coefficient `C(n, k)`.
///
/// Returns `f64::NEG_INFINITY` when `k > n` (the coefficient is zero).
pub fn ln_binomial_coef(n: u32, k: u32) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    if k == 0 {
        return 0.0;
    }
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}

/// Computes the binomial coefficient `C(n, k)`.
///
/// Uses the symmetry `C(n, k) = C(n, n - k)` to halve the work and
/// short-circuits `k ∈ {0, 1}`. Exact for `n <= 20`.
///
/// # Examples
/// ```
/// use fmodeler_core::math::combinatorics::binomial_coef;
///
/// assert_eq!(binomial_coef(8, 0), 1.0);
/// assert_eq!(binomial_coef(8, 8), 1.0);
/// assert_eq!(binomial_coef(8, 3), binomial_coef(8, 5));
/// ```
pub fn binomial_coef(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);

    match k {
        0 => 1.0,
        1 => f64::from(n),
        _ if n <= EXACT_LIMIT => {
            let n = u64::from(n);
            let k = u64::from(k);
            // Each partial product is itself a binomial coefficient, so the
            // division is always exact.
            (1..=k).fold(1_u64, |acc, i| acc * (n - k + i) / i) as f64
        }
        _ => ln_binomial_coef(n, k).exp().round(),
    }
}

/// Raises `base` to an integer power by repeated squaring.
///
/// Negative exponents return `1 / base^|exponent|`. `exponent == 0` returns one
/// for every base, including zero.
///
/// # Examples
/// ```
/// use fmodeler_core::math::combinatorics::int_power;
///
/// assert_eq!(int_power(3.0_f64, 4), 81.0);
/// assert_eq!(int_power(2.0_f64, -3), 0.125);
/// assert_eq!(int_power(0.0_f64, 0), 1.0);
/// ```
#[inline]
pub fn int_power<T: Float>(base: T, exponent: i32) -> T {
    if exponent == 0 {
        return T::one();
    }

    let mut remaining = exponent.unsigned_abs();
    let mut current = base;
    let mut result = T::one();

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result * current;
        }
        current = current * current;
        remaining >>= 1;
    }

    if exponent < 0 {
        T::one() / result
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // Factorial tests
    // ==========================================================

    #[test]
    fn test_factorial_small_values() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(1), 1.0);
        assert_eq!(factorial(5), 120.0);
        assert_eq!(factorial(10), 3_628_800.0);
    }

    #[test]
    fn test_factorial_exact_limit() {
        assert_eq!(factorial(20), 2_432_902_008_176_640_000_u64 as f64);
    }

    #[test]
    fn test_factorial_log_path() {
        // 21! = 51090942171709440000
        assert_relative_eq!(factorial(21), 51_090_942_171_709_440_000.0, max_relative = 1e-12);
        assert!(factorial(200).is_infinite());
    }

    #[test]
    fn test_ln_factorials_table_matches_direct() {
        let table = ln_factorials(50);
        assert_eq!(table.len(), 51);
        for (n, value) in table.iter().enumerate() {
            assert_relative_eq!(*value, ln_factorial(n as u32), epsilon = 1e-9);
        }
    }

    // ==========================================================
    // Binomial coefficient tests
    // ==========================================================

    #[test]
    fn test_binomial_coef_edges() {
        for n in [0, 1, 8, 20, 21, 100, 500] {
            assert_eq!(binomial_coef(n, 0), 1.0, "C({}, 0)", n);
            assert_eq!(binomial_coef(n, n), 1.0, "C({}, {})", n, n);
        }
        assert_eq!(binomial_coef(5, 6), 0.0);
        assert_eq!(binomial_coef(9, 1), 9.0);
        assert_eq!(binomial_coef(9, 8), 9.0);
    }

    #[test]
    fn test_binomial_coef_exact_values() {
        assert_eq!(binomial_coef(8, 4), 70.0);
        assert_eq!(binomial_coef(20, 10), 184_756.0);
        assert_eq!(binomial_coef(30, 15), 155_117_520.0);
    }

    #[test]
    fn test_binomial_coef_symmetry() {
        for n in 0..40 {
            for k in 0..=n {
                assert_eq!(binomial_coef(n, k), binomial_coef(n, n - k));
            }
        }
    }

    #[test]
    fn test_binomial_coef_pascal_rule() {
        for n in 1..20 {
            for k in 1..n {
                assert_eq!(
                    binomial_coef(n, k),
                    binomial_coef(n - 1, k - 1) + binomial_coef(n - 1, k)
                );
            }
        }
    }

    #[test]
    fn test_binomial_coef_large_n_is_finite() {
        let c = binomial_coef(500, 250);
        assert!(c.is_finite());
        assert_relative_eq!(c.ln(), ln_binomial_coef(500, 250), max_relative = 1e-12);
    }

    // ==========================================================
    // Integer power tests
    // ==========================================================

    #[test]
    fn test_int_power_zero_exponent() {
        for base in [0.0_f64, -3.5, 1.0, 1e300, f64::MIN_POSITIVE] {
            assert_eq!(int_power(base, 0), 1.0);
        }
    }

    #[test]
    fn test_int_power_positive_and_negative() {
        assert_eq!(int_power(2.0_f64, 10), 1024.0);
        assert_eq!(int_power(-2.0_f64, 3), -8.0);
        assert_eq!(int_power(2.0_f64, -2), 0.25);
        assert_relative_eq!(int_power(1.01_f64, 250), 1.01_f64.powi(250), max_relative = 1e-13);
    }

    #[test]
    fn test_int_power_extreme_exponent() {
        assert_eq!(int_power(1.0_f64, i32::MIN), 1.0);
        assert_eq!(int_power(0.5_f64, i32::MAX), 0.0);
    }

    #[test]
    fn test_int_power_f32() {
        assert_eq!(int_power(3.0_f32, 3), 27.0_f32);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_int_power_matches_powi(base in 0.5f64..2.0, exponent in -60i32..60) {
                let expected = base.powi(exponent);
                let result = int_power(base, exponent);
                prop_assert!(
                    (result - expected).abs() <= 1e-12 * expected.abs(),
                    "int_power({}, {}) = {} vs powi {}",
                    base, exponent, result, expected
                );
            }

            #[test]
            fn test_binomial_row_sums_to_power_of_two(n in 0u32..=60) {
                let sum: f64 = (0..=n).map(|k| binomial_coef(n, k)).sum();
                let expected = 2.0_f64.powi(n as i32);
                prop_assert!((sum - expected).abs() <= 1e-9 * expected);
            }
        }
    }
}
