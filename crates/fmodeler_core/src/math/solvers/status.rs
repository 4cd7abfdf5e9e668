//! Terminal solver states.

use std::fmt;

/// How a root search terminated.
///
/// Only [`Converged`](Self::Converged) and
/// [`StepConverged`](Self::StepConverged) are reliable. The other states carry
/// the best available estimate, which may be far from the true root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ConvergenceStatus {
    /// Function value fell below tolerance.
    Converged,
    /// Successive iterates moved less than the step tolerance.
    StepConverged,
    /// Derivative too flat to take a step.
    StalledDerivative,
    /// Iteration cap reached.
    IterationsExhausted,
    /// Next iterate was non-finite; the last finite one is reported.
    Diverged,
}

impl ConvergenceStatus {
    /// Returns whether the estimate should be trusted.
    #[inline]
    pub fn is_reliable(&self) -> bool {
        matches!(self, Self::Converged | Self::StepConverged)
    }

    /// Short machine-friendly label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::StepConverged => "step-converged",
            Self::StalledDerivative => "stalled-derivative",
            Self::IterationsExhausted => "iterations-exhausted",
            Self::Diverged => "diverged",
        }
    }
}

impl fmt::Display for ConvergenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimate produced by a root search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootResult<T> {
    /// Root estimate (last finite iterate for degraded outcomes)
    pub root: T,
    /// Newton steps taken
    pub iterations: usize,
    /// Terminal state
    pub status: ConvergenceStatus,
}

impl<T> RootResult<T> {
    /// Returns the root only when the search converged.
    pub fn reliable_root(self) -> Option<T> {
        self.status.is_reliable().then_some(self.root)
    }
}
