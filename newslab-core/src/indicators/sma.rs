//! Simple Moving Average (SMA) with minimum-period 1.
//!
//! Row i averages the last `min(window, i + 1)` values, so the first row's
//! mean is its own value.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window,
            name: format!("sma_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(values.len());
        let mut sum = 0.0;

        for (i, &entering) in values.iter().enumerate() {
            sum += entering;
            if i >= self.window {
                sum -= values[i - self.window];
            }
            let count = (i + 1).min(self.window);
            result.push(Some(sum / count as f64));
        }

        result
    }
}
