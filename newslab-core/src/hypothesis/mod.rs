//! Hypothesis/Anomaly Evaluator over a `FeatureRow` sequence.
//!
//! Produces counts plus the identifying rows behind each count, so every
//! finding can be traced back to dated bars.

pub mod bands;
pub mod ma_candle;

pub use bands::{detect_band_breaches, BandBreachReport, Breach, BreachDirection};
pub use ma_candle::{correlate_ma_candles, MaCandleReport, MaPercentages, MaVerdicts, Verdict};

use crate::features::FeatureRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The last evaluated row's moving-average state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub ma_above: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HypothesisReport {
    pub rows_evaluated: usize,
    /// Trailing-row window the report was restricted to, if any.
    pub window: Option<usize>,
    #[serde(flatten)]
    pub bands: BandBreachReport,
    pub ma_correlation: MaCandleReport,
    pub latest: Option<LatestSnapshot>,
}

/// Run both checks, optionally on the trailing `window` rows only.
///
/// Row identifiers keep their index in the full series.
pub fn evaluate(rows: &[FeatureRow], window: Option<usize>) -> HypothesisReport {
    let scoped = match window {
        Some(n) => &rows[rows.len().saturating_sub(n)..],
        None => rows,
    };

    HypothesisReport {
        rows_evaluated: scoped.len(),
        window,
        bands: detect_band_breaches(scoped),
        ma_correlation: correlate_ma_candles(scoped),
        latest: scoped.last().map(|row| LatestSnapshot {
            date: row.trade_date,
            close: row.close,
            ma_short: row.ma_short,
            ma_long: row.ma_long,
            ma_above: row.ma_above,
        }),
    }
}
