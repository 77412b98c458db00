//! Feature Engine: rolling indicators and return columns.
//!
//! Both computations assume ascending date order. The engine orders its own
//! input and refuses series it cannot order unambiguously (one date carrying
//! two different prices), so callers cannot feed it an unsorted column.

use crate::domain::{Candle, JoinedRecord, PriceBar};
use crate::indicators::{intraday_pct, pct_change, Bollinger, Indicator, RollingStd, Sma};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("empty price series")]
    EmptySeries,

    #[error("series cannot be ordered: conflicting prices on {date}")]
    UnsortedInput { date: NaiveDate },

    #[error("invalid feature parameters: {0}")]
    InvalidParams(String),
}

/// Window sizes and band width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureParams {
    pub band_window: usize,
    pub band_k: f64,
    pub ma_short: usize,
    pub ma_long: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            band_window: 20,
            band_k: 2.0,
            ma_short: 9,
            ma_long: 20,
        }
    }
}

impl FeatureParams {
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.band_window == 0 || self.ma_short == 0 || self.ma_long == 0 {
            return Err(FeatureError::InvalidParams("windows must be >= 1".into()));
        }
        if self.ma_short >= self.ma_long {
            return Err(FeatureError::InvalidParams(format!(
                "ma_short ({}) must be below ma_long ({})",
                self.ma_short, self.ma_long
            )));
        }
        if !self.band_k.is_finite() || self.band_k <= 0.0 {
            return Err(FeatureError::InvalidParams(format!(
                "band_k must be a positive number, got {}",
                self.band_k
            )));
        }
        Ok(())
    }
}

/// One price-series row with its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Position in the date-ordered series.
    pub index: usize,
    pub trade_date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    /// Band middle line (SMA over `band_window`).
    pub ma_band: f64,
    pub rolling_std: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub close_return: Option<f64>,
    pub intraday_return: Option<f64>,
    pub candle: Candle,
    /// Short moving average strictly above the long one.
    pub ma_above: bool,
}

/// A joined record with its return columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedFeatureRow {
    pub record: JoinedRecord,
    pub close_return: Option<f64>,
    pub intraday_return: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureEngine {
    params: FeatureParams,
}

impl FeatureEngine {
    pub fn new(params: FeatureParams) -> Result<Self, FeatureError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &FeatureParams {
        &self.params
    }

    /// Rolling indicators and returns for one ticker's bars.
    pub fn price_features(&self, bars: &[PriceBar]) -> Result<Vec<FeatureRow>, FeatureError> {
        let series = order_bars(bars).map_err(|e| {
            error!(error = %e, "price series rejected by feature engine");
            e
        })?;

        let closes: Vec<f64> = series.iter().map(|b| b.close).collect();
        let p = &self.params;

        let ma_short = Sma::new(p.ma_short).compute(&closes);
        let ma_long = Sma::new(p.ma_long).compute(&closes);
        let ma_band = Bollinger::middle(p.band_window, p.band_k).compute(&closes);
        let std = RollingStd::new(p.band_window).compute(&closes);
        let upper = Bollinger::upper(p.band_window, p.band_k).compute(&closes);
        let lower = Bollinger::lower(p.band_window, p.band_k).compute(&closes);
        let returns = pct_change(&closes.iter().copied().map(Some).collect::<Vec<_>>());

        let rows: Vec<FeatureRow> = series
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let short = ma_short[i].unwrap_or(bar.close);
                let long = ma_long[i].unwrap_or(bar.close);
                FeatureRow {
                    index: i,
                    trade_date: bar.trade_date,
                    open: bar.open,
                    close: bar.close,
                    ma_short: short,
                    ma_long: long,
                    ma_band: ma_band[i].unwrap_or(bar.close),
                    rolling_std: std[i],
                    bb_upper: upper[i],
                    bb_lower: lower[i],
                    close_return: returns[i],
                    intraday_return: intraday_pct(Some(bar.open), Some(bar.close)),
                    candle: bar.candle(),
                    ma_above: short > long,
                }
            })
            .collect();

        debug!(rows = rows.len(), "computed price features");
        Ok(rows)
    }

    /// Return columns for a joined dataset, ordered by price date.
    ///
    /// Unpriced records sort after priced ones; ties keep their input order.
    /// Several events on one trading day share a bar and must agree on its
    /// prices.
    pub fn return_features(
        &self,
        records: &[JoinedRecord],
    ) -> Result<Vec<JoinedFeatureRow>, FeatureError> {
        let mut ordered: Vec<&JoinedRecord> = records.iter().collect();
        ordered.sort_by_key(|r| (r.price_date().is_none(), r.price_date()));

        for pair in ordered.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].price, pair[1].price) {
                if a.price_date == b.price_date && (a.open != b.open || a.close != b.close) {
                    error!(date = %a.price_date, "joined records disagree on a bar");
                    return Err(FeatureError::UnsortedInput { date: a.price_date });
                }
            }
        }

        let closes: Vec<Option<f64>> = ordered.iter().map(|r| r.close()).collect();
        let returns = pct_change(&closes);

        Ok(ordered
            .into_iter()
            .zip(returns)
            .map(|(record, close_return)| JoinedFeatureRow {
                close_return,
                intraday_return: intraday_pct(record.open(), record.close()),
                record: record.clone(),
            })
            .collect())
    }
}

/// Date-ordered copy of `bars`, exact duplicates collapsed.
fn order_bars(bars: &[PriceBar]) -> Result<Vec<PriceBar>, FeatureError> {
    if bars.is_empty() {
        return Err(FeatureError::EmptySeries);
    }

    let mut sorted = bars.to_vec();
    sorted.sort_by_key(|b| b.trade_date);

    let mut unique: Vec<PriceBar> = Vec::with_capacity(sorted.len());
    for bar in sorted {
        match unique.last() {
            Some(prev) if prev.trade_date == bar.trade_date => {
                if !prev.same_prices(&bar) {
                    return Err(FeatureError::UnsortedInput {
                        date: bar.trade_date,
                    });
                }
            }
            _ => unique.push(bar),
        }
    }
    Ok(unique)
}
