//! Cox-Ross-Rubinstein binomial lattice pricer for European options.
//!
//! ## Lattice
//!
//! With Δt = T/N:
//! - u = e^(σ√Δt), d = e^(-σ√Δt)
//! - r_d = e^(rΔt) - 1 (per-period discrete rate)
//! - p = (1 + r_d - d) / (u - d)
//!
//! **Price**: (1 + r_d)^(-N) · Σ C(N,i) · pⁱ · (1-p)^(N-i) · payoff(S0·uⁱ·d^(N-i))
//!
//! Terminal nodes on the worthless side of the strike are skipped. Share
//! prices and node weights are combined in log space, so far-out nodes whose
//! price overflows contribute their vanishing weight instead of ∞·0.

use fmodeler_core::math::combinatorics::{binomial_coef, int_power, ln_factorials, EXACT_LIMIT};
use fmodeler_core::types::PricingError;
use tracing::{debug, warn};

use crate::params::{OptionType, PricingParameters};

/// Lattice coefficients derived from a [`PricingParameters`] bundle.
///
/// Recomputed on every pricing call; never cached across parameter changes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinomialInternal {
    /// Per-period rate e^(rΔt) - 1
    pub discrete_rf_rate: f64,
    /// Up-move multiplier u
    pub up_move_mul_coef: f64,
    /// Down-move multiplier d = 1/u
    pub down_move_mul_coef: f64,
    /// Risk-neutral probability of an up move
    pub up_move_rn_proba: f64,
    /// Risk-neutral probability of a down move
    pub down_move_rn_proba: f64,
    /// First up-move count at which the terminal price crosses the strike
    ///
    /// Calls pay for `i >= threshold_index` (S_i > K), puts for
    /// `i < threshold_index` (S_i < K). Equals `N + 1` when no node crosses.
    pub threshold_index: u32,
}

impl BinomialInternal {
    /// Derives lattice coefficients from validated parameters.
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` for inputs outside their domain
    /// - `PricingError::InvalidCalibration` when the up-move probability
    ///   falls outside [0, 1] (including σ = 0, where u = d)
    pub fn from_parameters(params: &PricingParameters) -> Result<Self, PricingError> {
        params.validate_lattice()?;

        let period_time = params.period_time();
        let vol_sqrt_dt = params.volatility * period_time.sqrt();

        let discrete_rf_rate = (params.continuous_rf_rate * period_time).exp_m1();
        let up_move_mul_coef = vol_sqrt_dt.exp();
        let down_move_mul_coef = (-vol_sqrt_dt).exp();

        let up_move_rn_proba =
            (1.0 + discrete_rf_rate - down_move_mul_coef) / (up_move_mul_coef - down_move_mul_coef);

        if !(0.0..=1.0).contains(&up_move_rn_proba) {
            warn!(
                up_move_rn_proba,
                period_time,
                volatility = params.volatility,
                rate = params.continuous_rf_rate,
                "Ill-calibrated binomial lattice"
            );
            return Err(PricingError::InvalidCalibration {
                up_probability: up_move_rn_proba,
            });
        }

        let mut internal = Self {
            discrete_rf_rate,
            up_move_mul_coef,
            down_move_mul_coef,
            up_move_rn_proba,
            down_move_rn_proba: 1.0 - up_move_rn_proba,
            threshold_index: 0,
        };
        internal.threshold_index = internal.find_threshold(params);
        Ok(internal)
    }

    /// Terminal share price after `up_moves` up moves out of `periods`.
    ///
    /// May be `f64::INFINITY` for extreme nodes of a wide lattice.
    #[inline]
    pub fn terminal_share_price(
        &self,
        initial_share_price: f64,
        up_moves: u32,
        periods: u32,
    ) -> f64 {
        initial_share_price * self.ln_growth(up_moves, periods).exp()
    }

    /// `ln(uⁱ · d^(N-i))`.
    fn ln_growth(&self, up_moves: u32, periods: u32) -> f64 {
        scaled_log(up_moves, self.up_move_mul_coef.ln())
            + scaled_log(periods - up_moves, self.down_move_mul_coef.ln())
    }

    fn find_threshold(&self, params: &PricingParameters) -> u32 {
        let n = params.period_number;
        let s0 = params.initial_share_price;
        let k = params.strike_price;

        (0..=n)
            .find(|&i| {
                let share_price = self.terminal_share_price(s0, i, n);
                match params.option_type {
                    OptionType::Call => share_price > k,
                    OptionType::Put => share_price >= k,
                }
            })
            .unwrap_or(n + 1)
    }
}

/// Binomial lattice pricer.
///
/// Pure function of its parameters: construction validates and derives the
/// lattice, [`price`](Self::price) only sums.
///
/// # Examples
/// ```
/// use fmodeler_models::binomial::BinomialPricer;
/// use fmodeler_models::params::{OptionType, PricingParameters};
///
/// let params = PricingParameters::new(OptionType::Put, 2.0, 8, 0.3, 0.02, 100.0, 105.0);
/// let pricer = BinomialPricer::new(params).unwrap();
/// assert!((pricer.price().unwrap() - 17.35).abs() < 5e-3);
/// ```
#[derive(Debug, Clone)]
pub struct BinomialPricer {
    params: PricingParameters,
    internal: BinomialInternal,
}

impl BinomialPricer {
    /// Creates a pricer after validating the parameters.
    ///
    /// # Errors
    /// See [`BinomialInternal::from_parameters`].
    pub fn new(params: PricingParameters) -> Result<Self, PricingError> {
        let internal = BinomialInternal::from_parameters(&params)?;
        Ok(Self { params, internal })
    }

    /// Returns the pricing parameters.
    #[inline]
    pub fn params(&self) -> &PricingParameters {
        &self.params
    }

    /// Returns the derived lattice coefficients.
    #[inline]
    pub fn internal(&self) -> &BinomialInternal {
        &self.internal
    }

    /// Discounted risk-neutral expectation of the terminal payoff.
    ///
    /// # Errors
    /// `PricingError::NumericalInstability` if the expectation overflows,
    /// which needs a discrete rate large enough that `S0·(1 + r_d)^N` leaves
    /// the `f64` range.
    pub fn price(&self) -> Result<f64, PricingError> {
        let n = self.params.period_number;
        let ln_s0 = self.params.initial_share_price.ln();
        let k = self.params.strike_price;
        let threshold = self.internal.threshold_index;

        let nodes = match self.params.option_type {
            OptionType::Call => threshold..n + 1,
            OptionType::Put => 0..threshold.min(n + 1),
        };

        let weights = NodeWeights::new(&self.internal, n);
        let expectation: f64 = nodes
            .map(|i| {
                // w·payoff(S, K) = payoff(w·S, w·K), never forming S on its own.
                let ln_weight = weights.ln_weight(i);
                let weighted_share = (ln_weight + ln_s0 + self.internal.ln_growth(i, n)).exp();
                let weighted_strike = ln_weight.exp() * k;
                self.params.option_type.payoff(weighted_share, weighted_strike)
            })
            .sum();

        let discount = int_power(1.0 + self.internal.discrete_rf_rate, -(n as i32));
        let price = expectation * discount;

        if !price.is_finite() {
            warn!(expectation, discount, periods = n, "Non-finite binomial price");
            return Err(PricingError::NumericalInstability(format!(
                "binomial expectation {} with discount {} over {} periods",
                expectation, discount, n
            )));
        }

        debug!(
            option_type = %self.params.option_type,
            periods = n,
            threshold,
            up_probability = self.internal.up_move_rn_proba,
            price,
            "Binomial price"
        );
        Ok(price)
    }
}

/// Risk-neutral probability of each terminal node, C(N,i)·pⁱ·q^(N-i).
///
/// Exact integer coefficients up to [`EXACT_LIMIT`] periods; beyond that the
/// weight is assembled in log space so that neither C(N,i) overflows nor pⁱ
/// underflows before the product is formed.
enum NodeWeights {
    Direct {
        periods: u32,
        up: f64,
        down: f64,
    },
    LogSpace {
        periods: u32,
        ln_up: f64,
        ln_down: f64,
        ln_fact: Vec<f64>,
    },
}

impl NodeWeights {
    fn new(internal: &BinomialInternal, periods: u32) -> Self {
        if periods <= EXACT_LIMIT {
            NodeWeights::Direct {
                periods,
                up: internal.up_move_rn_proba,
                down: internal.down_move_rn_proba,
            }
        } else {
            NodeWeights::LogSpace {
                periods,
                ln_up: internal.up_move_rn_proba.ln(),
                ln_down: internal.down_move_rn_proba.ln(),
                ln_fact: ln_factorials(periods),
            }
        }
    }

    fn ln_weight(&self, up_moves: u32) -> f64 {
        match self {
            NodeWeights::Direct { .. } => self.weight(up_moves).ln(),
            NodeWeights::LogSpace {
                periods,
                ln_up,
                ln_down,
                ln_fact,
            } => {
                let down_moves = periods - up_moves;
                ln_fact[*periods as usize]
                    - ln_fact[up_moves as usize]
                    - ln_fact[down_moves as usize]
                    + scaled_log(up_moves, *ln_up)
                    + scaled_log(down_moves, *ln_down)
            }
        }
    }

    fn weight(&self, up_moves: u32) -> f64 {
        match self {
            NodeWeights::Direct { periods, up, down } => {
                binomial_coef(*periods, up_moves)
                    * int_power(*up, up_moves as i32)
                    * int_power(*down, (periods - up_moves) as i32)
            }
            NodeWeights::LogSpace { .. } => self.ln_weight(up_moves).exp(),
        }
    }
}

/// `count · ln_p`, with zero occurrences contributing nothing even when p = 0.
#[inline]
fn scaled_log(count: u32, ln_p: f64) -> f64 {
    if count == 0 {
        0.0
    } else {
        f64::from(count) * ln_p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn scenario(option_type: OptionType, periods: u32) -> PricingParameters {
        PricingParameters::new(option_type, 2.0, periods, 0.3, 0.02, 100.0, 105.0)
    }

    #[test]
    fn test_lattice_coefficients() {
        let internal = BinomialInternal::from_parameters(&scenario(OptionType::Call, 8)).unwrap();

        assert_relative_eq!(
            internal.up_move_mul_coef * internal.down_move_mul_coef,
            1.0,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            internal.discrete_rf_rate,
            (0.02_f64 * 0.25).exp() - 1.0,
            epsilon = 1e-15
        );
        assert_relative_eq!(internal.up_move_rn_proba, 0.47922, epsilon = 1e-5);
        assert_relative_eq!(
            internal.up_move_rn_proba + internal.down_move_rn_proba,
            1.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_put_scenario_b() {
        let pricer = BinomialPricer::new(scenario(OptionType::Put, 8)).unwrap();
        assert_relative_eq!(pricer.price().unwrap(), 17.34656, epsilon = 1e-4);
    }

    #[test]
    fn test_call_eight_periods() {
        let pricer = BinomialPricer::new(scenario(OptionType::Call, 8)).unwrap();
        assert_relative_eq!(pricer.price().unwrap(), 16.46367, epsilon = 1e-4);
    }

    #[test]
    fn test_single_period_by_hand() {
        let params = PricingParameters::new(OptionType::Call, 1.0, 1, 0.2, 0.0, 100.0, 100.0);
        let pricer = BinomialPricer::new(params).unwrap();
        let internal = pricer.internal();

        let u = 0.2_f64.exp();
        let d = (-0.2_f64).exp();
        let p = (1.0 - d) / (u - d);
        assert_relative_eq!(internal.up_move_rn_proba, p, epsilon = 1e-14);
        assert_eq!(internal.threshold_index, 1);
        assert_relative_eq!(pricer.price().unwrap(), p * (100.0 * u - 100.0), epsilon = 1e-12);

        let put = BinomialPricer::new(params.with_option_type(OptionType::Put)).unwrap();
        assert_eq!(put.internal().threshold_index, 1);
        assert_relative_eq!(put.price().unwrap(), (1.0 - p) * (100.0 - 100.0 * d), epsilon = 1e-12);
    }

    #[test]
    fn test_threshold_separates_paying_nodes() {
        for option_type in [OptionType::Call, OptionType::Put] {
            let params = scenario(option_type, 8);
            let internal = BinomialInternal::from_parameters(&params).unwrap();
            let t = internal.threshold_index;
            assert!((1..=8).contains(&t));

            let below = internal.terminal_share_price(100.0, t - 1, 8);
            let at = internal.terminal_share_price(100.0, t, 8);
            assert!(below < 105.0);
            assert!(at > 105.0);
        }
    }

    #[test]
    fn test_deep_out_of_the_money_is_worthless() {
        let params = PricingParameters::new(OptionType::Call, 0.1, 4, 0.1, 0.0, 10.0, 1000.0);
        let pricer = BinomialPricer::new(params).unwrap();
        assert_eq!(pricer.internal().threshold_index, 5);
        assert_eq!(pricer.price().unwrap(), 0.0);

        let put = BinomialPricer::new(PricingParameters {
            strike_price: 0.01,
            option_type: OptionType::Put,
            ..params
        })
        .unwrap();
        assert_eq!(put.internal().threshold_index, 0);
        assert_eq!(put.price().unwrap(), 0.0);
    }

    #[test]
    fn test_log_space_weights_sum_to_one() {
        let params = scenario(OptionType::Call, 300);
        let internal = BinomialInternal::from_parameters(&params).unwrap();
        let weights = NodeWeights::new(&internal, 300);
        let total: f64 = (0..=300).map(|i| weights.weight(i)).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_weight_paths_agree_at_the_boundary() {
        let internal = BinomialInternal::from_parameters(&scenario(OptionType::Call, 20)).unwrap();
        let direct = NodeWeights::new(&internal, 20);
        let log_space = NodeWeights::LogSpace {
            periods: 20,
            ln_up: internal.up_move_rn_proba.ln(),
            ln_down: internal.down_move_rn_proba.ln(),
            ln_fact: ln_factorials(20),
        };
        for i in 0..=20 {
            assert_relative_eq!(direct.weight(i), log_space.weight(i), max_relative = 1e-10);
        }
    }

    #[test]
    fn test_wide_lattice_matches_black_scholes() {
        // σ√(TN) ≈ 894: the outermost terminal prices overflow to ∞.
        for option_type in [OptionType::Call, OptionType::Put] {
            let params = PricingParameters::new(option_type, 5.0, 40_000, 2.0, 0.02, 100.0, 105.0);
            let pricer = BinomialPricer::new(params).unwrap();
            let outermost = pricer.internal().terminal_share_price(100.0, 40_000, 40_000);
            assert_eq!(outermost, f64::INFINITY);

            let price = pricer.price().unwrap();
            let reference = crate::black_scholes::BlackScholesPricer::new(params)
                .unwrap()
                .calculate_initial_price();
            assert!(price.is_finite());
            assert_relative_eq!(price, reference, epsilon = 0.05);
        }
    }

    #[test]
    fn test_long_dated_wide_lattice_is_finite() {
        let params =
            PricingParameters::new(OptionType::Call, 5.0, 150_000, 1.0, 0.02, 100.0, 105.0);
        let price = BinomialPricer::new(params).unwrap().price().unwrap();
        assert!(price.is_finite());
        assert!(price > 0.0 && price < 100.0);
    }

    #[test]
    fn test_overflowing_expectation_is_reported() {
        // p ≈ 0.356 is valid, but S0·(1 + r_d)^N = 100·e^1000.
        let params =
            PricingParameters::new(OptionType::Call, 10.0, 1000, 20.0, 100.0, 100.0, 105.0);
        let pricer = BinomialPricer::new(params).unwrap();
        assert!(pricer.internal().up_move_rn_proba < 1.0);

        match pricer.price() {
            Err(PricingError::NumericalInstability(message)) => {
                assert!(message.contains("1000 periods"))
            }
            other => panic!("Expected NumericalInstability, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_volatility_is_ill_calibrated() {
        let params = scenario(OptionType::Call, 8).with_volatility(0.0);
        let err = BinomialPricer::new(params).unwrap_err();
        assert!(matches!(err, PricingError::InvalidCalibration { .. }));
    }

    #[test]
    fn test_high_rate_is_ill_calibrated() {
        // r·Δt far above σ√Δt pushes p above one.
        let params = PricingParameters::new(OptionType::Call, 10.0, 1, 0.05, 0.5, 100.0, 100.0);
        match BinomialPricer::new(params).unwrap_err() {
            PricingError::InvalidCalibration { up_probability } => assert!(up_probability > 1.0),
            other => panic!("Expected InvalidCalibration, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        let zero_periods = PricingParameters {
            period_number: 0,
            ..scenario(OptionType::Call, 8)
        };
        assert!(matches!(
            BinomialPricer::new(zero_periods),
            Err(PricingError::InvalidParameter { name: "period_number", .. })
        ));

        let zero_expiry = PricingParameters {
            expiry_time: 0.0,
            ..scenario(OptionType::Put, 8)
        };
        assert!(matches!(
            BinomialPricer::new(zero_expiry),
            Err(PricingError::InvalidParameter { name: "expiry_time", .. })
        ));
    }

    proptest! {
        #[test]
        fn test_lattice_put_call_parity(
            spot in 50.0_f64..150.0,
            strike in 50.0_f64..150.0,
            rate in -0.02_f64..0.08,
            volatility in 0.15_f64..0.6,
            expiry in 0.1_f64..3.0,
            periods in 1_u32..120,
        ) {
            let call = PricingParameters::new(
                OptionType::Call,
                expiry,
                periods,
                volatility,
                rate,
                spot,
                strike,
            );
            let put = call.with_option_type(OptionType::Put);
            let (Ok(call), Ok(put)) = (BinomialPricer::new(call), BinomialPricer::new(put)) else {
                return Ok(());
            };

            let discount = int_power(1.0 + call.internal().discrete_rf_rate, -(periods as i32));
            let parity = call.price().unwrap() - put.price().unwrap() - (spot - strike * discount);
            prop_assert!(parity.abs() < 1e-8, "parity residual {}", parity);
        }

        #[test]
        fn test_prices_are_non_negative(
            spot in 50.0_f64..150.0,
            strike in 50.0_f64..150.0,
            periods in 1_u32..60,
        ) {
            for option_type in [OptionType::Call, OptionType::Put] {
                let params =
                    PricingParameters::new(option_type, 1.0, periods, 0.25, 0.01, spot, strike);
                let price = BinomialPricer::new(params).unwrap().price().unwrap();
                prop_assert!(price >= 0.0);
                prop_assert!(price.is_finite());
            }
        }
    }
}
