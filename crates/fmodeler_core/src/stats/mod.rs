//! Sliding-window statistics over a price series.
//!
//! [`RollingStatistics`] owns the full series and exposes a borrowed view of
//! the active window. It is mutable state: give each analysis run its own
//! instance rather than sharing one across threads.

mod rolling;

pub use rolling::RollingStatistics;
