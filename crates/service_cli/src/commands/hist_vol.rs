//! Historical volatility command implementation
//!
//! Reads one price column from a CSV file and runs the rolling-window
//! volatility scan over it.

use std::io::Write;
use std::path::Path;

use fmodeler_core::types::PricingError;
use fmodeler_models::volatility::{HistoricalVolConfig, HistoricalVolatility};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::output::{emit, fixed, OutputFormat, Report};
use crate::{CliError, Result};

/// Result of the hist-vol command
#[derive(Debug, Clone, Serialize)]
pub struct HistVolReport {
    /// Input file
    pub source: String,
    /// Price column read
    pub column: String,
    /// Number of prices read
    pub observations: usize,
    /// Scan window size
    pub window_size: usize,
    /// Annualisation basis
    pub trading_days: f64,
    /// Mean annualised volatility
    pub mean_volatility: f64,
    /// Per-index volatility, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_index: Option<Vec<f64>>,
}

impl Report for HistVolReport {
    fn title(&self) -> String {
        format!("Historical volatility of '{}'", self.column)
    }

    fn rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Source".to_string(), self.source.clone()),
            ("Observations".to_string(), self.observations.to_string()),
            ("Window".to_string(), self.window_size.to_string()),
            ("Trading days".to_string(), fixed(self.trading_days, 1)),
            ("Mean volatility".to_string(), fixed(self.mean_volatility, 6)),
        ];
        if let Some(series) = &self.per_index {
            rows.extend(
                series
                    .iter()
                    .enumerate()
                    .skip(self.window_size)
                    .map(|(i, v)| (format!("Index {}", i), fixed(*v, 6))),
            );
        }
        rows
    }
}

/// Reads the column named `column` (case-insensitive) from a headed CSV file.
pub fn read_price_column(path: &Path, column: &str) -> Result<Vec<f64>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let index = reader
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| {
            CliError::invalid_argument(format!(
                "column '{}' not found in {}",
                column,
                path.display()
            ))
        })?;

    let mut prices = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = row + 2;
        let raw = record.get(index).unwrap_or("").trim();
        let value: f64 = raw.parse().map_err(|_| {
            CliError::invalid_argument(format!("line {}: '{}' is not a number", line, raw))
        })?;
        prices.push(value);
    }

    debug!(rows = prices.len(), column, "Price column loaded");
    Ok(prices)
}

/// Run the hist-vol command
pub fn run<W: Write>(
    path: &Path,
    column: &str,
    window_size: Option<usize>,
    show_series: bool,
    config: &CliConfig,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let settings = HistoricalVolConfig {
        window_size: window_size.unwrap_or(config.historical.window_size),
        ..config.historical_config()
    };
    info!(
        path = %path.display(),
        column,
        window_size = settings.window_size,
        "Estimating historical volatility"
    );

    let prices = read_price_column(path, column)?;
    let estimate = HistoricalVolatility::new(settings)?
        .estimate(&prices)
        .map_err(PricingError::from)?;

    let report = HistVolReport {
        source: path.display().to_string(),
        column: column.to_string(),
        observations: prices.len(),
        window_size: settings.window_size,
        trading_days: settings.trading_days,
        mean_volatility: estimate.mean_volatility,
        per_index: show_series.then_some(estimate.per_index),
    };
    emit(out, format, &report)
}
