//! Rolling indicators over a single numeric column.
//!
//! All indicators use a minimum-period rule instead of a NaN warmup: a
//! leading window shorter than `window` still produces a value from whatever
//! points are available, as long as `min_periods()` of them exist. Undefined
//! values are `None`, never NaN or zero.
//!
//! Multi-series indicators (Bollinger) are exposed as separate named
//! instances per band, keeping the single-series `Indicator` trait unchanged.

pub mod bollinger;
pub mod returns;
pub mod rolling_std;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand};
pub use returns::{intraday_pct, pct_change};
pub use rolling_std::RollingStd;
pub use sma::Sma;

/// A trailing-window statistic.
///
/// # Look-ahead contamination guard
/// No value at row t may depend on rows t+1 or later; computing on a
/// truncated series must reproduce the same prefix.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "bb_upper_20_2").
    fn name(&self) -> &str;

    /// Fewest observations that yield a defined value.
    fn min_periods(&self) -> usize;

    /// Compute over the whole column; output has the same length as `values`.
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>>;
}

/// Trailing window `[i + 1 - window, i]`, clipped at the start of the column.
pub(crate) fn trailing(values: &[f64], i: usize, window: usize) -> &[f64] {
    let start = (i + 1).saturating_sub(window);
    &values[start..=i]
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
