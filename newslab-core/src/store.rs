//! Price Series Store: one ticker's daily bars, loaded once, queried many times.
//!
//! Bars are held sorted by `trade_date` with unique dates, so both lookups
//! are binary searches. The store is immutable after `load` and is `Sync`:
//! concurrent joins share it by reference without locking.

use crate::domain::PriceBar;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("ticker must not be empty")]
    EmptyTicker,

    #[error("conflicting bars for {ticker} on {date}: ({first_open}, {first_close}) vs ({second_open}, {second_close})")]
    ConflictingBar {
        ticker: String,
        date: NaiveDate,
        first_open: f64,
        first_close: f64,
        second_open: f64,
        second_close: f64,
    },

    #[error("non-finite price for {ticker} on {date}")]
    NonFinitePrice { ticker: String, date: NaiveDate },
}

#[derive(Debug, Clone)]
pub struct PriceSeriesStore {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeriesStore {
    /// Bulk-load a ticker's bars.
    ///
    /// Input order does not matter. Exact duplicate dates collapse to one bar;
    /// a date carrying two different prices is rejected. The ticker on every
    /// bar is overwritten with `ticker`.
    pub fn load(ticker: &str, bars: Vec<PriceBar>) -> Result<Self, StoreError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(StoreError::EmptyTicker);
        }

        let mut bars = bars;
        for bar in &mut bars {
            if !bar.is_finite() {
                return Err(StoreError::NonFinitePrice {
                    ticker: ticker.to_string(),
                    date: bar.trade_date,
                });
            }
            if bar.ticker != ticker {
                bar.ticker = ticker.to_string();
            }
        }

        bars.sort_by_key(|b| b.trade_date);

        let mut unique: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match unique.last() {
                Some(prev) if prev.trade_date == bar.trade_date => {
                    if !prev.same_prices(&bar) {
                        return Err(StoreError::ConflictingBar {
                            ticker: ticker.to_string(),
                            date: bar.trade_date,
                            first_open: prev.open,
                            first_close: prev.close,
                            second_open: bar.open,
                            second_close: bar.close,
                        });
                    }
                }
                _ => unique.push(bar),
            }
        }

        debug!(ticker, bars = unique.len(), "loaded price series");
        Ok(Self {
            ticker: ticker.to_string(),
            bars: unique,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// All bars, ascending by date.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.trade_date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.trade_date)
    }

    /// The bar dated exactly `date`.
    pub fn get_exact(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.bars
            .binary_search_by_key(&date, |b| b.trade_date)
            .ok()
            .map(|i| &self.bars[i])
    }

    /// The bar at `date`, else the nearest bar strictly before it.
    ///
    /// Never returns a bar dated after `date`; `None` when no bar exists on
    /// or before `date`.
    pub fn get_with_fallback(&self, date: NaiveDate) -> Option<&PriceBar> {
        let upto = self.bars.partition_point(|b| b.trade_date <= date);
        upto.checked_sub(1).map(|i| &self.bars[i])
    }
}
