//! Rolling mean and standard deviation.

use std::ops::Range;

use tracing::trace;

use crate::types::StatisticsError;

/// Price history with an active sliding window.
///
/// The window is a range into the owned series, so moving it never copies
/// data. Statistics are computed against the current contents of the series,
/// including any in-place transformation applied after the window was set.
///
/// # Examples
/// ```
/// use fmodeler_core::stats::RollingStatistics;
///
/// let mut stats = RollingStatistics::new();
/// stats.set_data_from_slice(&[100.0, 110.0, 99.0]);
/// stats.convert_to_relative_changes().unwrap();
/// assert_eq!(stats.data()[0], 0.0);
///
/// stats.set_rolling_window(1, 2).unwrap();
/// let mean = stats.calculate_rolling_mean().unwrap();
/// assert!((mean - 0.0).abs() < 1e-12);
///
/// // Out-of-range requests leave the previous window in place.
/// assert!(stats.set_rolling_window(2, 5).is_err());
/// assert_eq!(stats.window().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollingStatistics {
    complete_data: Vec<f64>,
    window: Option<Range<usize>>,
}

impl RollingStatistics {
    /// Creates an empty calculator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one observation.
    pub fn add_data(&mut self, value: f64) {
        self.complete_data.push(value);
    }

    /// Clears the series and the window.
    pub fn clear_data(&mut self) {
        self.complete_data.clear();
        self.window = None;
    }

    /// Replaces the series wholesale, preserving order, and unsets the window.
    pub fn set_data_from_slice(&mut self, values: &[f64]) {
        self.complete_data.clear();
        self.complete_data.extend_from_slice(values);
        self.window = None;
    }

    /// The full series.
    pub fn data(&self) -> &[f64] {
        &self.complete_data
    }

    /// Number of observations in the series.
    pub fn len(&self) -> usize {
        self.complete_data.len()
    }

    /// Returns true when the series is empty.
    pub fn is_empty(&self) -> bool {
        self.complete_data.is_empty()
    }

    /// Transforms the series into relative changes, in place.
    ///
    /// `x[i] -> (x[i] - x[i-1]) / x[i-1]` for `i >= 1` and `x[0] -> 0`. This
    /// is destructive: reload the raw prices to start over.
    ///
    /// # Errors
    /// `StatisticsError::InvalidValue` if any reference value (every element
    /// but the last) is zero or non-finite. The series is left untouched.
    pub fn convert_to_relative_changes(&mut self) -> Result<(), StatisticsError> {
        let references = self.complete_data.len().saturating_sub(1);
        if let Some((index, &value)) = self.complete_data[..references]
            .iter()
            .enumerate()
            .find(|(_, v)| **v == 0.0 || !v.is_finite())
        {
            return Err(StatisticsError::InvalidValue { index, value });
        }

        // Walk backwards so each reference value is still the raw price.
        for i in (1..self.complete_data.len()).rev() {
            let previous = self.complete_data[i - 1];
            self.complete_data[i] = (self.complete_data[i] - previous) / previous;
        }
        if let Some(first) = self.complete_data.first_mut() {
            *first = 0.0;
        }

        Ok(())
    }

    /// Moves the window to `[start, start + length)`.
    ///
    /// # Errors
    /// `StatisticsError::NoDataWindow` if the range is empty or runs past the
    /// end of the series. The previous window is kept.
    pub fn set_rolling_window(
        &mut self,
        start: usize,
        length: usize,
    ) -> Result<(), StatisticsError> {
        let available = self.complete_data.len();
        let end = start
            .checked_add(length)
            .filter(|&end| length > 0 && end <= available)
            .ok_or_else(|| {
                StatisticsError::no_data_window(format!(
                    "window [{}, {}+{}) does not fit {} values",
                    start, start, length, available
                ))
            })?;

        trace!(start, end, "rolling window moved");
        self.window = Some(start..end);
        Ok(())
    }

    /// Unsets the window.
    pub fn clear_window(&mut self) {
        self.window = None;
    }

    /// The active window, if one is set.
    pub fn window(&self) -> Option<&[f64]> {
        self.window
            .as_ref()
            .and_then(|range| self.complete_data.get(range.clone()))
    }

    /// Arithmetic mean of the window.
    ///
    /// # Errors
    /// `StatisticsError::NoDataWindow` if no window is set.
    pub fn calculate_rolling_mean(&self) -> Result<f64, StatisticsError> {
        self.active_window().map(mean)
    }

    /// Population standard deviation of the window (divides by its length).
    ///
    /// # Errors
    /// `StatisticsError::NoDataWindow` if no window is set.
    pub fn calculate_rolling_standard_deviation(&self) -> Result<f64, StatisticsError> {
        self.active_window().map(population_std_dev)
    }

    fn active_window(&self) -> Result<&[f64], StatisticsError> {
        self.window()
            .filter(|w| !w.is_empty())
            .ok_or_else(|| StatisticsError::no_data_window("no rolling window has been set"))
    }
}

impl From<Vec<f64>> for RollingStatistics {
    fn from(complete_data: Vec<f64>) -> Self {
        Self {
            complete_data,
            window: None,
        }
    }
}

/// Mean shifted by the first element, so a constant slice returns that
/// constant exactly. `values` must be non-empty.
fn mean(values: &[f64]) -> f64 {
    let pivot = values[0];
    let shifted: f64 = values.iter().map(|v| v - pivot).sum();
    pivot + shifted / values.len() as f64
}

fn population_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn loaded(values: &[f64]) -> RollingStatistics {
        let mut stats = RollingStatistics::new();
        stats.set_data_from_slice(values);
        stats
    }

    // ==========================================================
    // Data management
    // ==========================================================

    #[test]
    fn test_add_and_clear_data() {
        let mut stats = RollingStatistics::new();
        assert!(stats.is_empty());

        stats.add_data(1.0);
        stats.add_data(2.0);
        assert_eq!(stats.data(), &[1.0, 2.0]);

        stats.set_rolling_window(0, 2).unwrap();
        stats.clear_data();
        assert!(stats.is_empty());
        assert!(stats.window().is_none());
    }

    #[test]
    fn test_set_data_replaces_and_unsets_window() {
        let mut stats = loaded(&[1.0, 2.0, 3.0]);
        stats.set_rolling_window(0, 3).unwrap();

        stats.set_data_from_slice(&[5.0, 6.0]);
        assert_eq!(stats.data(), &[5.0, 6.0]);
        assert!(stats.window().is_none());
    }

    #[test]
    fn test_from_vec() {
        let stats = RollingStatistics::from(vec![3.0, 4.0]);
        assert_eq!(stats.len(), 2);
    }

    // ==========================================================
    // Relative changes
    // ==========================================================

    #[test]
    fn test_convert_to_relative_changes() {
        let mut stats = loaded(&[100.0, 110.0, 99.0, 99.0]);
        stats.convert_to_relative_changes().unwrap();

        let data = stats.data();
        assert_eq!(data[0], 0.0);
        assert_relative_eq!(data[1], 0.1, epsilon = 1e-15);
        assert_relative_eq!(data[2], -0.1, epsilon = 1e-15);
        assert_eq!(data[3], 0.0);
    }

    #[test]
    fn test_convert_rejects_zero_reference() {
        let mut stats = loaded(&[100.0, 0.0, 50.0]);
        let err = stats.convert_to_relative_changes().unwrap_err();

        assert_eq!(
            err,
            StatisticsError::InvalidValue {
                index: 1,
                value: 0.0
            }
        );
        assert_eq!(stats.data(), &[100.0, 0.0, 50.0]);
    }

    #[test]
    fn test_convert_allows_zero_last_value() {
        let mut stats = loaded(&[100.0, 0.0]);
        stats.convert_to_relative_changes().unwrap();
        assert_eq!(stats.data(), &[0.0, -1.0]);
    }

    #[test]
    fn test_convert_empty_and_single() {
        let mut stats = RollingStatistics::new();
        stats.convert_to_relative_changes().unwrap();
        assert!(stats.is_empty());

        let mut stats = loaded(&[42.0]);
        stats.convert_to_relative_changes().unwrap();
        assert_eq!(stats.data(), &[0.0]);
    }

    // ==========================================================
    // Window handling
    // ==========================================================

    #[test]
    fn test_window_view() {
        let mut stats = loaded(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        stats.set_rolling_window(1, 3).unwrap();
        assert_eq!(stats.window().unwrap(), &[2.0, 3.0, 4.0]);

        stats.set_rolling_window(2, 3).unwrap();
        assert_eq!(stats.window().unwrap(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_out_of_range_window_keeps_previous() {
        let mut stats = loaded(&[1.0, 2.0, 3.0]);
        stats.set_rolling_window(0, 2).unwrap();

        let err = stats.set_rolling_window(2, 2).unwrap_err();
        assert!(matches!(err, StatisticsError::NoDataWindow(_)));
        assert_eq!(stats.window().unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_zero_length_and_overflowing_window_rejected() {
        let mut stats = loaded(&[1.0, 2.0, 3.0]);
        assert!(stats.set_rolling_window(0, 0).is_err());
        assert!(stats.set_rolling_window(usize::MAX, 2).is_err());
        assert!(stats.window().is_none());
    }

    #[test]
    fn test_window_on_empty_series_rejected() {
        let mut stats = RollingStatistics::new();
        assert!(stats.set_rolling_window(0, 1).is_err());
    }

    #[test]
    fn test_statistics_without_window_fail() {
        let mut stats = loaded(&[1.0, 2.0]);
        assert!(matches!(
            stats.calculate_rolling_mean(),
            Err(StatisticsError::NoDataWindow(_))
        ));
        assert!(matches!(
            stats.calculate_rolling_standard_deviation(),
            Err(StatisticsError::NoDataWindow(_))
        ));

        stats.set_rolling_window(0, 2).unwrap();
        stats.clear_window();
        assert!(stats.calculate_rolling_mean().is_err());
    }

    // ==========================================================
    // Mean and standard deviation
    // ==========================================================

    #[test]
    fn test_mean_and_population_std_dev() {
        let mut stats = loaded(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        stats.set_rolling_window(0, 8).unwrap();

        assert_relative_eq!(stats.calculate_rolling_mean().unwrap(), 5.0, epsilon = 1e-15);
        assert_relative_eq!(
            stats.calculate_rolling_standard_deviation().unwrap(),
            2.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_single_value_window() {
        let mut stats = loaded(&[3.5, 7.0]);
        stats.set_rolling_window(1, 1).unwrap();
        assert_eq!(stats.calculate_rolling_mean().unwrap(), 7.0);
        assert_eq!(stats.calculate_rolling_standard_deviation().unwrap(), 0.0);
    }

    #[test]
    fn test_window_reflects_in_place_conversion() {
        let mut stats = loaded(&[100.0, 110.0, 121.0]);
        stats.set_rolling_window(1, 2).unwrap();
        stats.convert_to_relative_changes().unwrap();

        assert_relative_eq!(stats.calculate_rolling_mean().unwrap(), 0.1, epsilon = 1e-14);
        assert!(stats.calculate_rolling_standard_deviation().unwrap() < 1e-14);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_constant_window_is_exact(a in -1e6f64..1e6, len in 1usize..64) {
                let mut stats = loaded(&vec![a; len]);
                stats.set_rolling_window(0, len).unwrap();

                prop_assert_eq!(stats.calculate_rolling_mean().unwrap(), a);
                prop_assert_eq!(stats.calculate_rolling_standard_deviation().unwrap(), 0.0);
            }

            #[test]
            fn test_std_dev_shift_invariant(
                values in proptest::collection::vec(-100.0f64..100.0, 2..40),
                shift in -1000.0f64..1000.0,
            ) {
                let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
                let mut a = loaded(&values);
                let mut b = loaded(&shifted);
                a.set_rolling_window(0, values.len()).unwrap();
                b.set_rolling_window(0, values.len()).unwrap();

                let sa = a.calculate_rolling_standard_deviation().unwrap();
                let sb = b.calculate_rolling_standard_deviation().unwrap();
                prop_assert!(sa >= 0.0);
                prop_assert!((sa - sb).abs() < 1e-9, "std {} vs shifted {}", sa, sb);
            }

            #[test]
            fn test_mean_within_window_bounds(
                values in proptest::collection::vec(-1e3f64..1e3, 1..40),
            ) {
                let mut stats = loaded(&values);
                stats.set_rolling_window(0, values.len()).unwrap();
                let m = stats.calculate_rolling_mean().unwrap();
                let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(m >= lo - 1e-9 && m <= hi + 1e-9);
            }
        }
    }
}
