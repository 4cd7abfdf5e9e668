//! CLI configuration management.
//!
//! Loads settings from a TOML file, applies `FMODELER_*` environment
//! overrides and validates the result.
//!
//! ```toml
//! log_level = "info"
//! output_format = "table"
//!
//! [historical]
//! window_size = 20
//! trading_days = 255.0
//!
//! [implied_vol]
//! max_iterations = 100
//! price_tolerance = 1e-8
//! require_convergence = false
//! ```

use std::path::Path;

use fmodeler_models::implied_vol::ImpliedVolConfig;
use fmodeler_models::volatility::HistoricalVolConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::output::OutputFormat;

/// Environment variable overriding `log_level`.
pub const ENV_LOG_LEVEL: &str = "FMODELER_LOG_LEVEL";
/// Environment variable overriding `historical.window_size`.
pub const ENV_WINDOW_SIZE: &str = "FMODELER_WINDOW_SIZE";
/// Environment variable overriding `historical.trading_days`.
pub const ENV_TRADING_DAYS: &str = "FMODELER_TRADING_DAYS";
/// Environment variable overriding `output_format`.
pub const ENV_OUTPUT_FORMAT: &str = "FMODELER_OUTPUT_FORMAT";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Historical volatility settings
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoricalSection {
    /// Relative changes per window
    pub window_size: usize,
    /// Annualisation basis
    pub trading_days: f64,
}

impl Default for HistoricalSection {
    fn default() -> Self {
        let defaults = HistoricalVolConfig::default();
        Self {
            window_size: defaults.window_size,
            trading_days: defaults.trading_days,
        }
    }
}

/// Implied volatility settings
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImpliedVolSection {
    /// Newton iteration cap
    pub max_iterations: usize,
    /// Price tolerance for convergence
    pub price_tolerance: f64,
    /// Starting volatility, bypassing the closed-form guess
    pub initial_guess: Option<f64>,
    /// Treat degraded results as errors
    pub require_convergence: bool,
}

impl Default for ImpliedVolSection {
    fn default() -> Self {
        let defaults = ImpliedVolConfig::default();
        Self {
            max_iterations: defaults.max_iterations,
            price_tolerance: defaults.price_tolerance,
            initial_guess: None,
            require_convergence: false,
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Historical volatility settings
    #[serde(default)]
    pub historical: HistoricalSection,

    /// Implied volatility settings
    #[serde(default)]
    pub implied_vol: ImpliedVolSection,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_format: OutputFormat::default(),
            historical: HistoricalSection::default(),
            implied_vol: ImpliedVolSection::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `FMODELER_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = log_level;
        }

        if let Some(value) = lookup(ENV_WINDOW_SIZE) {
            self.historical.window_size = parse_override(ENV_WINDOW_SIZE, &value)?;
        }

        if let Some(value) = lookup(ENV_TRADING_DAYS) {
            self.historical.trading_days = parse_override(ENV_TRADING_DAYS, &value)?;
        }

        if let Some(value) = lookup(ENV_OUTPUT_FORMAT) {
            self.output_format = parse_override(ENV_OUTPUT_FORMAT, &value)?;
        }

        Ok(self)
    }

    /// Validate the configuration, collecting every violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if self.historical.window_size == 0 {
            errors.push("historical.window_size must be greater than 0".to_string());
        }

        if !(self.historical.trading_days.is_finite() && self.historical.trading_days > 0.0) {
            errors.push(format!(
                "historical.trading_days {} must be positive",
                self.historical.trading_days
            ));
        }

        if self.implied_vol.max_iterations == 0 {
            errors.push("implied_vol.max_iterations must be greater than 0".to_string());
        }

        if !(self.implied_vol.price_tolerance.is_finite() && self.implied_vol.price_tolerance > 0.0)
        {
            errors.push(format!(
                "implied_vol.price_tolerance {} must be positive",
                self.implied_vol.price_tolerance
            ));
        }

        if let Some(guess) = self.implied_vol.initial_guess {
            if !(guess.is_finite() && guess > 0.0) {
                errors.push(format!("implied_vol.initial_guess {} must be positive", guess));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file (if present) with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override()?;
        config.validate()?;
        Ok(config)
    }

    /// Historical volatility estimator settings
    pub fn historical_config(&self) -> HistoricalVolConfig {
        HistoricalVolConfig {
            window_size: self.historical.window_size,
            trading_days: self.historical.trading_days,
        }
    }

    /// Implied volatility solver settings
    pub fn implied_vol_config(&self) -> ImpliedVolConfig {
        let config = ImpliedVolConfig::default()
            .with_max_iterations(self.implied_vol.max_iterations)
            .with_price_tolerance(self.implied_vol.price_tolerance);
        match self.implied_vol.initial_guess {
            Some(guess) => config.with_initial_guess(guess),
            None => config,
        }
    }
}

fn parse_override<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var,
        value: value.to_string(),
    })
}

/// Configuration error type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unparsable environment override
    #[error("Invalid value '{value}' for {var}")]
    Env {
        /// Variable name
        var: &'static str,
        /// Rejected value
        value: String,
    },

    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
