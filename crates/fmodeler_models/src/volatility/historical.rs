//! Rolling-window historical volatility.
//!
//! Prices are converted to relative changes, then for every index `i >= W`
//! the population standard deviation of the changes in `[i - W, i)` is
//! annualised by `√trading_days`. Indices before the first full window report
//! zero and are excluded from the mean.

use fmodeler_core::stats::RollingStatistics;
use fmodeler_core::types::{PricingError, StatisticsError};
use tracing::debug;

use crate::params::positive;

/// Default scan window, in observations.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Default annualisation basis, in trading days per year.
pub const DEFAULT_TRADING_DAYS: f64 = 255.0;

/// Historical volatility settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoricalVolConfig {
    /// Number of relative changes per window (W)
    pub window_size: usize,
    /// Trading days per year used for annualisation
    pub trading_days: f64,
}

impl Default for HistoricalVolConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            trading_days: DEFAULT_TRADING_DAYS,
        }
    }
}

impl HistoricalVolConfig {
    /// Creates a configuration with the given window and the default basis.
    pub fn with_window_size(window_size: usize) -> Self {
        Self {
            window_size,
            ..Self::default()
        }
    }

    /// Checks the window size and annualisation basis.
    ///
    /// # Errors
    /// - `PricingError::Statistics(InvalidWindowSize)` for a zero window
    /// - `PricingError::InvalidParameter` for a non-positive basis
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.window_size == 0 {
            return Err(StatisticsError::InvalidWindowSize(0).into());
        }
        positive("trading_days", self.trading_days)
    }
}

/// Result of a historical-volatility scan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoricalVolatilityEstimate {
    /// Annualised volatility per price index, zero before the first full window
    pub per_index: Vec<f64>,
    /// Mean over the indices with a full window
    pub mean_volatility: f64,
    /// Window size used
    pub window_size: usize,
}

impl HistoricalVolatilityEstimate {
    /// Volatilities of the indices with a full window.
    pub fn valid(&self) -> &[f64] {
        &self.per_index[self.window_size..]
    }
}

/// Historical volatility estimator.
///
/// # Examples
/// ```
/// use fmodeler_models::volatility::{HistoricalVolConfig, HistoricalVolatility};
///
/// let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 3) as f64).collect();
/// let estimator = HistoricalVolatility::new(HistoricalVolConfig::default()).unwrap();
/// let estimate = estimator.estimate(&prices).unwrap();
///
/// assert_eq!(estimate.per_index.len(), 30);
/// assert!(estimate.per_index[..20].iter().all(|&v| v == 0.0));
/// assert!(estimate.mean_volatility > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct HistoricalVolatility {
    config: HistoricalVolConfig,
}

impl HistoricalVolatility {
    /// Creates an estimator.
    ///
    /// # Errors
    /// See [`HistoricalVolConfig::validate`].
    pub fn new(config: HistoricalVolConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HistoricalVolConfig {
        &self.config
    }

    /// Scans `prices` and returns per-index and mean annualised volatility.
    ///
    /// # Errors
    /// - `StatisticsError::InsufficientData` when `prices` holds no more than
    ///   one window
    /// - `StatisticsError::InvalidValue` when a price used as a reference is
    ///   zero or non-finite
    pub fn estimate(
        &self,
        prices: &[f64],
    ) -> Result<HistoricalVolatilityEstimate, StatisticsError> {
        let window_size = self.config.window_size;
        if prices.len() <= window_size {
            return Err(StatisticsError::InsufficientData {
                got: prices.len(),
                need: window_size + 1,
            });
        }

        let mut stats = RollingStatistics::from(prices.to_vec());
        stats.convert_to_relative_changes()?;

        let annualisation = self.config.trading_days.sqrt();
        let mut per_index = vec![0.0; prices.len()];
        for (i, slot) in per_index.iter_mut().enumerate().skip(window_size) {
            stats.set_rolling_window(i - window_size, window_size)?;
            *slot = stats.calculate_rolling_standard_deviation()? * annualisation;
        }

        let valid = &per_index[window_size..];
        let mean_volatility = valid.iter().sum::<f64>() / valid.len() as f64;

        debug!(
            observations = prices.len(),
            window_size,
            windows = valid.len(),
            mean_volatility,
            "Historical volatility scan"
        );

        Ok(HistoricalVolatilityEstimate {
            per_index,
            mean_volatility,
            window_size,
        })
    }
}
