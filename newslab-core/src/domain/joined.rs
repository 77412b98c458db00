//! JoinedRecord: a NewsEvent priced against its trading-day bar.

use super::news::NewsEvent;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Open/close of the bar an event was joined to, and that bar's date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub open: f64,
    pub close: f64,
    pub price_date: NaiveDate,
}

/// A `NewsEvent` plus `{open, close, price_date}`.
///
/// `price` is `None` for undated events and lookup misses; the record still
/// passes through so a batch join never aborts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub event: NewsEvent,
    pub price: Option<PriceQuote>,
}

impl JoinedRecord {
    pub fn price_date(&self) -> Option<NaiveDate> {
        self.price.map(|p| p.price_date)
    }

    pub fn open(&self) -> Option<f64> {
        self.price.map(|p| p.open)
    }

    pub fn close(&self) -> Option<f64> {
        self.price.map(|p| p.close)
    }
}
