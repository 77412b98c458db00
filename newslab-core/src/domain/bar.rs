//! PriceBar: one trading day for one ticker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily open/close record for a single ticker.
///
/// The Price Series Store guarantees at most one bar per `(ticker, trade_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub ticker: String,
    pub trade_date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(ticker: impl Into<String>, trade_date: NaiveDate, open: f64, close: f64) -> Self {
        Self {
            ticker: ticker.into(),
            trade_date,
            open,
            close,
        }
    }

    /// True if both prices are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.close.is_finite()
    }

    /// Same-bar candle color.
    pub fn candle(&self) -> Candle {
        Candle::from_open_close(self.open, self.close)
    }

    /// Two bars for the same date carry the same prices.
    pub fn same_prices(&self, other: &PriceBar) -> bool {
        self.open == other.open && self.close == other.close
    }
}

/// Candle color of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Candle {
    /// close > open
    Green,
    /// close < open
    Red,
    /// close == open
    Doji,
}

impl Candle {
    pub fn from_open_close(open: f64, close: f64) -> Self {
        if close > open {
            Candle::Green
        } else if close < open {
            Candle::Red
        } else {
            Candle::Doji
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Candle::Green => "green",
            Candle::Red => "red",
            Candle::Doji => "doji",
        }
    }
}
