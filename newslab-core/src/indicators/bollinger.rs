//! Bollinger Bands: moving average +/- k sample standard deviations.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, window), minimum-period 1
//! - Upper: middle + k * sample_std(close, window)
//! - Lower: middle - k * sample_std(close, window)
//!
//! Upper and lower are undefined while the trailing window holds fewer than
//! two points. A zero-width band there would flag every later close as a
//! breach.

use super::rolling_std::sample_std;
use super::{trailing, Indicator};

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    window: usize,
    k: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(window: usize, k: f64, band: BollingerBand, label: &str) -> Self {
        assert!(window >= 1, "Bollinger window must be >= 1");
        Self {
            window,
            k,
            band,
            name: format!("bb_{label}_{window}_{k}"),
        }
    }

    pub fn upper(window: usize, k: f64) -> Self {
        Self::with_band(window, k, BollingerBand::Upper, "upper")
    }

    pub fn middle(window: usize, k: f64) -> Self {
        Self::with_band(window, k, BollingerBand::Middle, "middle")
    }

    pub fn lower(window: usize, k: f64) -> Self {
        Self::with_band(window, k, BollingerBand::Lower, "lower")
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        match self.band {
            BollingerBand::Middle => 1,
            BollingerBand::Upper | BollingerBand::Lower => 2,
        }
    }

    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|i| {
                let window = trailing(values, i, self.window);
                let mean = window.iter().sum::<f64>() / window.len() as f64;
                match self.band {
                    BollingerBand::Middle => Some(mean),
                    BollingerBand::Upper => sample_std(window).map(|sd| mean + self.k * sd),
                    BollingerBand::Lower => sample_std(window).map(|sd| mean - self.k * sd),
                }
            })
            .collect()
    }
}
