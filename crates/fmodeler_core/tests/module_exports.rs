//! Integration tests for module exports.
//!
//! Verify that public modules and types are reachable via absolute paths.

/// Test that combinatorics functions are accessible via absolute path.
#[test]
fn test_combinatorics_module_exports() {
    use fmodeler_core::math::combinatorics::binomial_coef;
    use fmodeler_core::math::combinatorics::factorial;
    use fmodeler_core::math::combinatorics::int_power;
    use fmodeler_core::math::combinatorics::ln_binomial_coef;
    use fmodeler_core::math::combinatorics::ln_factorial;

    assert_eq!(factorial(6), 720.0);
    assert_eq!(binomial_coef(10, 3), 120.0);
    assert!((ln_binomial_coef(10, 3) - 120.0_f64.ln()).abs() < 1e-12);
    assert!((ln_factorial(6) - 720.0_f64.ln()).abs() < 1e-12);
    assert_eq!(int_power(0.0_f64, 0), 1.0);
}

/// Test that distribution and differentiation helpers are accessible.
#[test]
fn test_distribution_module_exports() {
    use fmodeler_core::math::differentiation::{differentiate, differentiate_default};
    use fmodeler_core::math::distributions::{norm_cdf, norm_pdf};

    assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
    assert!((norm_pdf(0.0) - 1.0 / (2.0 * std::f64::consts::PI).sqrt()).abs() < 1e-15);

    // The derivative of N is n.
    let slope = differentiate(norm_cdf, 0.3, 1e-6);
    assert!((slope - norm_pdf(0.3)).abs() < 1e-5);
    assert!((differentiate_default(|x: f64| x * x, 2.0) - 4.0).abs() < 1e-4);
}

/// Test that solver types are accessible via the solvers module.
#[test]
fn test_solver_module_exports() {
    use fmodeler_core::math::solvers::{
        find_newton_root, ConvergenceStatus, NewtonRaphsonSolver, RootResult, SolverConfig,
    };

    let solver: NewtonRaphsonSolver<f64> = NewtonRaphsonSolver::new(SolverConfig::default());
    let result: RootResult<f64> = solver.find_root(|x| x * x - 4.0, |x| 2.0 * x, 1.0);
    assert!(result.status.is_reliable());

    let generic = find_newton_root(|x: f64| x.ln() - 1.0, 2.0, 1e-10);
    assert!((generic.root - std::f64::consts::E).abs() < 1e-7);
    assert_ne!(generic.status, ConvergenceStatus::Diverged);
}

/// Test that rolling statistics and error types are accessible.
#[test]
fn test_stats_and_error_exports() {
    use fmodeler_core::stats::RollingStatistics;
    use fmodeler_core::types::{PricingError, StatisticsError};

    let mut stats = RollingStatistics::new();
    for price in [5.0, 5.0, 5.0, 5.0] {
        stats.add_data(price);
    }
    assert_eq!(
        stats.calculate_rolling_mean(),
        Err(StatisticsError::no_data_window("no rolling window has been set"))
    );

    stats.set_rolling_window(0, 4).unwrap();
    assert_eq!(stats.calculate_rolling_mean().unwrap(), 5.0);
    assert_eq!(stats.calculate_rolling_standard_deviation().unwrap(), 0.0);

    let err: PricingError = StatisticsError::InvalidWindowSize(0).into();
    assert!(!err.is_input_error());
}
