//! Root-finding solvers with explicit convergence reporting.
//!
//! ## Available Solvers
//!
//! - [`NewtonRaphsonSolver`]: Newton iteration with an analytic or
//!   finite-difference derivative
//! - [`find_newton_root`]: Convenience wrapper with default settings
//!
//! ## Configuration
//!
//! [`SolverConfig`] controls:
//! - `tolerance`: Function-value stopping criterion (default: 1e-8)
//! - `step_tolerance`: Step-size stopping criterion (default: 1e-10)
//! - `max_iterations`: Iteration cap (default: 100)
//! - `derivative_step`: Finite-difference step (default: 1e-7)
//! - `derivative_floor`: Smallest usable derivative magnitude (default: 1e-10)
//! - `damping`: Fraction of the Newton step taken (default: 1)
//!
//! ## Outcomes
//!
//! Solvers never fail outright. They return a [`RootResult`] whose
//! [`ConvergenceStatus`] tells the caller whether the estimate can be trusted.
//!
//! ```
//! use fmodeler_core::math::solvers::{ConvergenceStatus, NewtonRaphsonSolver, SolverConfig};
//!
//! let solver = NewtonRaphsonSolver::new(SolverConfig::default());
//! let result = solver.find_root(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, 1.0);
//!
//! assert!(result.status.is_reliable());
//! assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-8);
//! ```

mod config;
mod newton_raphson;
mod status;

pub use config::SolverConfig;
pub use newton_raphson::{find_newton_root, NewtonRaphsonSolver};
pub use status::{ConvergenceStatus, RootResult};
