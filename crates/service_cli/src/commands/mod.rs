//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands write their
//! report to a caller-supplied writer so they can be exercised in tests.

pub mod check;
pub mod hist_vol;
pub mod implied_vol;
pub mod price;
