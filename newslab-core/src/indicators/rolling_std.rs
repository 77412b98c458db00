//! Rolling sample standard deviation (divide by N - 1).
//!
//! Defined once the trailing window holds at least two points; a single
//! point has no sample deviation and yields `None`, not zero.

use super::{trailing, Indicator};

#[derive(Debug, Clone)]
pub struct RollingStd {
    window: usize,
    name: String,
}

impl RollingStd {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "rolling std window must be >= 1");
        Self {
            window,
            name: format!("std_{window}"),
        }
    }
}

/// Sample standard deviation of `window`, `None` below two points.
pub(crate) fn sample_std(window: &[f64]) -> Option<f64> {
    let n = window.len();
    if n < 2 {
        return None;
    }
    let mean = window.iter().sum::<f64>() / n as f64;
    let ss: f64 = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum();
    Some((ss / (n - 1) as f64).sqrt())
}

impl Indicator for RollingStd {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|i| sample_std(trailing(values, i, self.window)))
            .collect()
    }
}
