//! Summaries and diagnostics for recorded sample sequences: pooled means,
//! per-series summaries, sample autocorrelation, and a windowed
//! acceptance-rate tracker.

use ndarray::prelude::*;
use ndarray_stats::QuantileExt;
use num_traits::Float;
use std::collections::VecDeque;

/// Mean over every chain and sample, per dimension.
///
/// Expects samples shaped `(n_chains, n_samples, dim)` as produced by
/// [`crate::core::ChainRunner::run`].
pub fn pooled_mean<T: Float>(samples: &Array3<T>) -> Array1<T> {
    let dim = samples.shape()[2];
    let n = T::from(samples.shape()[0] * samples.shape()[1]).unwrap();
    let mut out = Array1::<T>::zeros(dim);
    for d in 0..dim {
        let sum = samples
            .index_axis(Axis(2), d)
            .iter()
            .fold(T::zero(), |acc, &x| acc + x);
        out[d] = sum / n;
    }
    out
}

/// Basic summary of a scalar sample series.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    /// Unbiased sample variance.
    pub var: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarizes a scalar series: count, mean, unbiased variance, min, max.
///
/// Returns `None` for series with fewer than two elements.
pub fn summarize(series: &ArrayView1<f64>) -> Option<Summary> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let mean = series.mean()?;
    let var = series.mapv(|x| (x - mean) * (x - mean)).sum() / (n as f64 - 1.0);
    let min = *series.min().ok()?;
    let max = *series.max().ok()?;
    Some(Summary {
        n,
        mean,
        var,
        min,
        max,
    })
}

/// Normalized sample autocorrelation of a scalar series at lags
/// `0..=max_lag`.
///
/// Lag 0 is always 1. A `max_lag` of `series.len()` or more is clamped to
/// the largest lag the series supports, so the output never exceeds
/// `series.len()` entries. This is what thinning trades compute for:
/// recorded samples taken every T-th step show smaller low-lag
/// autocorrelation than the raw chain.
pub fn autocorrelation(series: &ArrayView1<f64>, max_lag: usize) -> Array1<f64> {
    let n = series.len();
    if n == 0 {
        return Array1::zeros(0);
    }
    let max_lag = max_lag.min(n - 1);
    let mean = series.mean().unwrap_or(0.0);
    let centered = series.mapv(|x| x - mean);
    let denom: f64 = centered.mapv(|x| x * x).sum();

    let mut acf = Array1::<f64>::zeros(max_lag + 1);
    if denom == 0.0 {
        // Constant series: define lag 0 as 1, everything else as 0.
        acf[0] = 1.0;
        return acf;
    }
    for lag in 0..=max_lag {
        let mut cov = 0.0;
        for i in 0..(n - lag) {
            cov += centered[i] * centered[i + lag];
        }
        acf[lag] = cov / denom;
    }
    acf
}

/// Tracks the fraction of recent chain transitions that were accepted,
/// inferred from whether consecutive recorded states differ.
///
/// Keeps a sliding window so long runs report the current acceptance
/// behavior rather than an all-time average.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptanceTracker {
    window: usize,
    last_state: Option<Vec<f64>>,
    accepts: VecDeque<bool>,
}

impl AcceptanceTracker {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            last_state: None,
            accepts: VecDeque::new(),
        }
    }

    /// Records one observed state. The first state only initializes the
    /// tracker.
    pub fn observe(&mut self, state: &[f64]) {
        if let Some(last) = &self.last_state {
            let moved = last.as_slice() != state;
            self.accepts.push_back(moved);
            if self.accepts.len() > self.window {
                self.accepts.pop_front();
            }
        }
        self.last_state = Some(state.to_vec());
    }

    /// Acceptance rate over the window, or `None` before any transition has
    /// been observed.
    pub fn rate(&self) -> Option<f64> {
        if self.accepts.is_empty() {
            return None;
        }
        let accepted = self.accepts.iter().filter(|&&a| a).count();
        Some(accepted as f64 / self.accepts.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pooled_mean_averages_over_chains_and_samples() {
        // 2 chains x 2 samples x 1 dim.
        let samples = array![[[1.0], [2.0]], [[3.0], [6.0]]];
        let mean = pooled_mean(&samples);
        assert_abs_diff_eq!(mean[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn summarize_matches_hand_computation() {
        let series = array![1.0, 2.0, 3.0, 4.0];
        let s = summarize(&series.view()).unwrap();
        assert_eq!(s.n, 4);
        assert_abs_diff_eq!(s.mean, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.var, 5.0 / 3.0, epsilon = 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn summarize_rejects_short_series() {
        let series = array![1.0];
        assert!(summarize(&series.view()).is_none());
    }

    #[test]
    fn autocorrelation_lag_zero_is_one() {
        let series = array![0.3, -0.2, 1.7, 0.4, -1.1, 0.6];
        let acf = autocorrelation(&series.view(), 3);
        assert_abs_diff_eq!(acf[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn autocorrelation_of_alternating_series_is_negative_at_lag_one() {
        let series = array![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let acf = autocorrelation(&series.view(), 1);
        assert!(acf[1] < -0.5);
    }

    #[test]
    fn autocorrelation_clamps_oversized_lags() {
        let series = array![0.5, -0.5, 1.5, 0.0];
        // Lags beyond the series length are clamped, not a panic.
        let acf = autocorrelation(&series.view(), 100);
        assert_eq!(acf.len(), 4);
        assert_abs_diff_eq!(acf[0], 1.0, epsilon = 1e-12);

        let empty = ndarray::Array1::<f64>::zeros(0);
        assert_eq!(autocorrelation(&empty.view(), 3).len(), 0);
    }

    #[test]
    fn autocorrelation_of_constant_series_is_defined() {
        let series = array![2.0, 2.0, 2.0, 2.0];
        let acf = autocorrelation(&series.view(), 2);
        assert_eq!(acf.to_vec(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn acceptance_tracker_counts_moves() {
        let mut tracker = AcceptanceTracker::new(100);
        assert_eq!(tracker.rate(), None);
        tracker.observe(&[1.0]);
        assert_eq!(tracker.rate(), None);
        tracker.observe(&[2.0]); // move
        tracker.observe(&[2.0]); // stay
        tracker.observe(&[3.0]); // move
        tracker.observe(&[3.0]); // stay
        assert_abs_diff_eq!(tracker.rate().unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn acceptance_tracker_window_slides() {
        let mut tracker = AcceptanceTracker::new(2);
        tracker.observe(&[0.0]);
        tracker.observe(&[0.0]); // stay
        tracker.observe(&[1.0]); // move
        tracker.observe(&[2.0]); // move, pushes the stay out of the window
        assert_abs_diff_eq!(tracker.rate().unwrap(), 1.0, epsilon = 1e-12);
    }
}
