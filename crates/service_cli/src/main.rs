//! fmodeler - European option pricing and volatility from the command line
//!
//! # Commands
//!
//! - `fmodeler price` - Price an option with the binomial lattice or Black-Scholes
//! - `fmodeler implied-vol` - Recover implied volatility from a market price
//! - `fmodeler hist-vol --prices <file>` - Historical volatility of a CSV price column
//! - `fmodeler check` - Replay the reference scenarios

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fmodeler_cli::config::CliConfig;
use fmodeler_cli::output::OutputFormat;
use fmodeler_cli::{commands, Result};
use fmodeler_models::params::{OptionType, PricingMethod, PricingParameters};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// FintechModeler option pricing CLI
#[derive(Parser)]
#[command(name = "fmodeler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "fmodeler.toml")]
    config: PathBuf,

    /// Output format (json, table), overriding the configuration
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a European option
    Price {
        /// Option type (call, put)
        #[arg(short = 't', long)]
        option_type: OptionType,

        /// Pricing method (binomial, black-scholes)
        #[arg(short, long, default_value = "black-scholes")]
        method: PricingMethod,

        /// Time to expiry in years
        #[arg(long)]
        expiry: f64,

        /// Lattice periods (binomial only)
        #[arg(short = 'n', long, default_value = "100")]
        periods: u32,

        /// Annualised volatility
        #[arg(long)]
        volatility: f64,

        /// Continuously compounded risk-free rate
        #[arg(long, allow_negative_numbers = true)]
        rate: f64,

        /// Spot share price
        #[arg(long)]
        spot: f64,

        /// Strike price
        #[arg(long)]
        strike: f64,
    },

    /// Recover Black-Scholes implied volatility from a market price
    ImpliedVol {
        /// Observed option price
        #[arg(short = 'p', long)]
        market_price: f64,

        /// Option type (call, put)
        #[arg(short = 't', long)]
        option_type: OptionType,

        /// Time to expiry in years
        #[arg(long)]
        expiry: f64,

        /// Continuously compounded risk-free rate
        #[arg(long, allow_negative_numbers = true)]
        rate: f64,

        /// Spot share price
        #[arg(long)]
        spot: f64,

        /// Strike price
        #[arg(long)]
        strike: f64,

        /// Print every solver iteration
        #[arg(long)]
        trace: bool,
    },

    /// Estimate historical volatility from a CSV price column
    HistVol {
        /// CSV file with a header row
        #[arg(short, long)]
        prices: PathBuf,

        /// Price column name
        #[arg(long, default_value = "close")]
        column: String,

        /// Scan window size, overriding the configuration
        #[arg(short, long)]
        window: Option<usize>,

        /// Print the per-index series
        #[arg(long)]
        series: bool,
    },

    /// Replay the reference scenarios and report pass/fail
    Check,
}

fn init_tracing(config: &CliConfig, verbose: bool) {
    let fallback = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load_with_env_and_validate(&cli.config)?;
    init_tracing(&config, cli.verbose);
    debug!(?config, "Configuration loaded");

    let format = cli.format.unwrap_or(config.output_format);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Price {
            option_type,
            method,
            expiry,
            periods,
            volatility,
            rate,
            spot,
            strike,
        } => {
            let params =
                PricingParameters::new(
                    option_type,
                    expiry,
                    periods,
                    volatility,
                    rate,
                    spot,
                    strike,
                );
            commands::price::run(&params, method, format, &mut out)?;
        }
        Commands::ImpliedVol {
            market_price,
            option_type,
            expiry,
            rate,
            spot,
            strike,
            trace,
        } => {
            let params = PricingParameters::new(option_type, expiry, 1, 0.0, rate, spot, strike);
            commands::implied_vol::run(&params, market_price, &config, trace, format, &mut out)?;
        }
        Commands::HistVol {
            prices,
            column,
            window,
            series,
        } => commands::hist_vol::run(&prices, &column, window, series, &config, format, &mut out)?,
        Commands::Check => commands::check::run(format, &mut out)?,
    }

    out.flush()?;
    Ok(())
}
