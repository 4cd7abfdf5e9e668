//! Newton-Raphson root-finding solver.

use num_traits::Float;
use tracing::debug;

use super::{ConvergenceStatus, RootResult, SolverConfig};
use crate::math::differentiation::differentiate;

/// Newton-Raphson root finder.
///
/// Uses `x_{n+1} = x_n - damping * f(x_n) / f'(x_n)`, stopping on either a
/// small function value or a small step. The iteration cap doubles as the
/// only timeout; there is no other cancellation.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use fmodeler_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// // Solve x³ - x - 2 = 0
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
/// let f = |x: f64| x * x * x - x - 2.0;
/// let f_prime = |x: f64| 3.0 * x * x - 1.0;
///
/// let result = solver.find_root(f, f_prime, 1.5);
/// assert!(result.status.is_reliable());
/// assert!(f(result.root).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Create a new solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Find a root of `f` using the explicit derivative `f_prime`.
    ///
    /// # Returns
    ///
    /// A [`RootResult`] whose status is:
    /// - `Converged` when `|f(x)| < tolerance`
    /// - `StepConverged` when the step falls below `step_tolerance`
    /// - `StalledDerivative` when `|f'(x)| < derivative_floor`
    /// - `Diverged` when the next iterate is non-finite (last finite `x` kept)
    /// - `IterationsExhausted` otherwise
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: T) -> RootResult<T>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        let mut x = x0;

        for iteration in 0..self.config.max_iterations {
            let f_val = f(x);

            if f_val.abs() < self.config.tolerance {
                return self.finish(x, iteration, ConvergenceStatus::Converged);
            }

            let f_prime_val = f_prime(x);

            if f_prime_val.is_nan() || f_prime_val.abs() < self.config.derivative_floor {
                return self.finish(x, iteration, ConvergenceStatus::StalledDerivative);
            }

            let next = x - self.config.damping * f_val / f_prime_val;

            if !next.is_finite() {
                return self.finish(x, iteration, ConvergenceStatus::Diverged);
            }

            if (next - x).abs() < self.config.step_tolerance {
                return self.finish(next, iteration + 1, ConvergenceStatus::StepConverged);
            }

            x = next;
        }

        self.finish(
            x,
            self.config.max_iterations,
            ConvergenceStatus::IterationsExhausted,
        )
    }

    /// Find a root of `f` with a forward-difference derivative.
    ///
    /// The derivative step is `config.derivative_step`.
    ///
    /// # Example
    ///
    /// ```
    /// use fmodeler_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
    ///
    /// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
    /// let result = solver.find_root_numeric(|x: f64| x.exp() - 2.0, 0.5);
    /// assert!((result.root - 2.0_f64.ln()).abs() < 1e-7);
    /// ```
    pub fn find_root_numeric<F>(&self, f: F, x0: T) -> RootResult<T>
    where
        F: Fn(T) -> T,
    {
        let dx = self.config.derivative_step;
        self.find_root(&f, |x| differentiate(&f, x, dx), x0)
    }

    fn finish(&self, root: T, iterations: usize, status: ConvergenceStatus) -> RootResult<T> {
        if !status.is_reliable() {
            debug!(%status, iterations, "Newton search ended without convergence");
        }
        RootResult {
            root,
            iterations,
            status,
        }
    }
}

/// Generic Newton search with a finite-difference derivative.
///
/// Uses the default [`SolverConfig`] with the function tolerance replaced by
/// `tol`.
///
/// # Example
///
/// ```
/// use fmodeler_core::math::solvers::find_newton_root;
///
/// let result = find_newton_root(|x: f64| x * x - 9.0, 1.0, 1e-10);
/// assert!((result.root - 3.0).abs() < 1e-8);
/// ```
pub fn find_newton_root<F>(f: F, x0: f64, tol: f64) -> RootResult<f64>
where
    F: Fn(f64) -> f64,
{
    let config = SolverConfig {
        tolerance: tol,
        ..SolverConfig::default()
    };
    NewtonRaphsonSolver::new(config).find_root_numeric(f, x0)
}
