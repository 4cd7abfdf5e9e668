//! Shared error types.
//!
//! # Re-exports
//!
//! [`PricingError`] and [`StatisticsError`] are re-exported at this module level.

pub mod error;

pub use error::{PricingError, StatisticsError};
