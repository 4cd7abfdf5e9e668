//! Solver configuration types.

use num_traits::Float;

/// Configuration for Newton-type root finding.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for tolerances (e.g., `f64`)
///
/// # Example
///
/// ```
/// use fmodeler_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert_eq!(config.max_iterations, 100);
///
/// let custom = SolverConfig::new(1e-12, 200).with_step_tolerance(1e-14);
/// assert_eq!(custom.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// The solver stops when `|f(x)| < tolerance`.
    pub tolerance: T,

    /// The solver stops when `|x_{n+1} - x_n| < step_tolerance`.
    pub step_tolerance: T,

    /// Maximum number of Newton steps.
    pub max_iterations: usize,

    /// Step used for finite-difference derivatives.
    pub derivative_step: T,

    /// Derivatives smaller than this in magnitude stall the search.
    pub derivative_floor: T,

    /// Fraction of the full Newton step applied each iteration, in (0, 1].
    pub damping: T,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `tolerance`: 1e-8
    /// - `step_tolerance`: 1e-10
    /// - `max_iterations`: 100
    /// - `derivative_step`: 1e-7
    /// - `derivative_floor`: 1e-10
    /// - `damping`: 1
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-8).unwrap_or_else(T::epsilon),
            step_tolerance: T::from(1e-10).unwrap_or_else(T::epsilon),
            max_iterations: 100,
            derivative_step: T::from(1e-7).unwrap_or_else(T::epsilon),
            derivative_floor: T::from(1e-10).unwrap_or_else(T::min_positive_value),
            damping: T::one(),
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a configuration with the given function tolerance and iteration cap.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the step-size tolerance.
    #[must_use]
    pub fn with_step_tolerance(mut self, step_tolerance: T) -> Self {
        self.step_tolerance = step_tolerance;
        self
    }

    /// Sets the finite-difference step.
    ///
    /// # Panics
    ///
    /// Panics if `derivative_step <= 0`.
    #[must_use]
    pub fn with_derivative_step(mut self, derivative_step: T) -> Self {
        assert!(derivative_step > T::zero(), "derivative_step must be positive");
        self.derivative_step = derivative_step;
        self
    }

    /// Sets the damping factor.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < damping <= 1`.
    #[must_use]
    pub fn with_damping(mut self, damping: T) -> Self {
        assert!(
            damping > T::zero() && damping <= T::one(),
            "damping must be in (0, 1]"
        );
        self.damping = damping;
        self
    }
}
