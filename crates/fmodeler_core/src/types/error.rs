//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from pricing and implied-volatility operations
//! - `StatisticsError`: Errors from rolling-window statistics

use thiserror::Error;

use crate::math::solvers::ConvergenceStatus;

/// Categorised pricing errors.
///
/// All variants are local, synchronous failures returned to the immediate
/// caller. Pricing is deterministic, so none of them is worth retrying with
/// the same inputs.
///
/// # Variants
/// - `InvalidParameter`: An input is outside its admissible domain
/// - `InvalidCalibration`: Binomial risk-neutral probability outside [0, 1]
/// - `NotConverged`: Implied volatility requested as reliable but degraded
/// - `NumericalInstability`: Valid inputs produced a non-finite result
/// - `Statistics`: Failure in the rolling-window statistics layer
///
/// # Examples
/// ```
/// use fmodeler_core::types::PricingError;
///
/// let err = PricingError::invalid_parameter("strike_price", -5.0, "must be positive");
/// assert_eq!(
///     format!("{}", err),
///     "Invalid parameter strike_price = -5: must be positive"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Input parameter outside its admissible domain.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Constraint the value violates
        reason: &'static str,
    },

    /// Lattice parameters yield a risk-neutral probability outside [0, 1].
    #[error("Invalid calibration: up-move risk-neutral probability {up_probability} outside [0, 1]")]
    InvalidCalibration {
        /// The computed up-move probability
        up_probability: f64,
    },

    /// Root search ended without a reliable estimate.
    #[error("Implied volatility did not converge ({status}) after {iterations} iterations, last estimate {volatility}")]
    NotConverged {
        /// Terminal solver state
        status: ConvergenceStatus,
        /// Last volatility estimate
        volatility: f64,
        /// Iterations performed
        iterations: usize,
    },

    /// Valid inputs produced a non-finite result.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Rolling statistics failure.
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
}

impl PricingError {
    /// Create an invalid-parameter error.
    pub fn invalid_parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Returns true for errors caused by caller-supplied inputs.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PricingError::InvalidParameter { .. } | PricingError::InvalidCalibration { .. }
        )
    }
}

/// Rolling-window statistics errors.
///
/// # Variants
/// - `NoDataWindow`: Window out of range, empty, or never set
/// - `InsufficientData`: Series too short for the requested scan
/// - `InvalidValue`: Relative change against an unusable reference value
/// - `InvalidWindowSize`: Zero-length scan window
///
/// # Examples
/// ```
/// use fmodeler_core::types::StatisticsError;
///
/// let err = StatisticsError::InsufficientData { got: 5, need: 21 };
/// assert!(format!("{}", err).contains("need at least 21"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatisticsError {
    /// No usable data window.
    #[error("No data window: {0}")]
    NoDataWindow(String),

    /// Not enough observations.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of observations provided
        got: usize,
        /// Minimum number of observations required
        need: usize,
    },

    /// Reference value cannot be used as a denominator.
    #[error("Invalid reference value {value} at index {index}")]
    InvalidValue {
        /// Index of the reference value
        index: usize,
        /// The offending value
        value: f64,
    },

    /// Window size must be at least one.
    #[error("Invalid window size: {0}")]
    InvalidWindowSize(usize),
}

impl StatisticsError {
    /// Create a no-data-window error.
    pub fn no_data_window(msg: impl Into<String>) -> Self {
        Self::NoDataWindow(msg.into())
    }
}
