//! Realised volatility estimation from price series.
//!
//! # Re-exports
//!
//! [`HistoricalVolatility`], [`HistoricalVolConfig`] and
//! [`HistoricalVolatilityEstimate`] are re-exported at this module level.

pub mod historical;

pub use historical::{HistoricalVolConfig, HistoricalVolatility, HistoricalVolatilityEstimate};
