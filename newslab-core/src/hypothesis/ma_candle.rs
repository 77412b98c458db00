//! Moving-average ordering vs same-bar candle color.
//!
//! Rows split on whether the short MA is above the long MA. Within each
//! bucket green and red candles are counted; doji candles are counted but
//! stay out of the percentages. The hypothesis: green dominates while the
//! short MA is above, red dominates otherwise.

use crate::domain::Candle;
use crate::features::FeatureRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Supported,
    NotSupported,
    /// No green or red candles fell in the bucket.
    NoData,
}

/// Green/red share of each bucket; `None` marks an empty bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MaPercentages {
    pub green_below: Option<f64>,
    pub red_below: Option<f64>,
    pub green_above: Option<f64>,
    pub red_above: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaVerdicts {
    /// Green beats red while the short MA is above the long MA.
    pub green_when_above: Verdict,
    /// Red beats green while the short MA is not above the long MA.
    pub red_when_below: Verdict,
}

impl Default for MaVerdicts {
    fn default() -> Self {
        Self {
            green_when_above: Verdict::NoData,
            red_when_below: Verdict::NoData,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaCandleReport {
    pub green_below: usize,
    pub red_below: usize,
    pub green_above: usize,
    pub red_above: usize,
    pub doji_below: usize,
    pub doji_above: usize,
    pub percentages: MaPercentages,
    pub verdicts: MaVerdicts,
}

pub fn correlate_ma_candles(rows: &[FeatureRow]) -> MaCandleReport {
    let mut report = MaCandleReport::default();

    for row in rows {
        let slot = match (row.ma_above, row.candle) {
            (true, Candle::Green) => &mut report.green_above,
            (true, Candle::Red) => &mut report.red_above,
            (true, Candle::Doji) => &mut report.doji_above,
            (false, Candle::Green) => &mut report.green_below,
            (false, Candle::Red) => &mut report.red_below,
            (false, Candle::Doji) => &mut report.doji_below,
        };
        *slot += 1;
    }

    let (green_below, red_below) = shares(report.green_below, report.red_below);
    let (green_above, red_above) = shares(report.green_above, report.red_above);
    report.percentages = MaPercentages {
        green_below,
        red_below,
        green_above,
        red_above,
    };
    report.verdicts = MaVerdicts {
        green_when_above: dominance(report.green_above, report.red_above),
        red_when_below: dominance(report.red_below, report.green_below),
    };
    report
}

fn shares(green: usize, red: usize) -> (Option<f64>, Option<f64>) {
    let total = green + red;
    if total == 0 {
        return (None, None);
    }
    let pct = |n: usize| Some(n as f64 / total as f64 * 100.0);
    (pct(green), pct(red))
}

fn dominance(expected: usize, other: usize) -> Verdict {
    if expected + other == 0 {
        Verdict::NoData
    } else if expected > other {
        Verdict::Supported
    } else {
        Verdict::NotSupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(ma_above: bool, open: f64, close: f64) -> FeatureRow {
        FeatureRow {
            index: 0,
            trade_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            open,
            close,
            ma_short: close,
            ma_long: close,
            ma_band: close,
            rolling_std: None,
            bb_upper: None,
            bb_lower: None,
            close_return: None,
            intraday_return: None,
            candle: Candle::from_open_close(open, close),
            ma_above,
        }
    }

    #[test]
    fn cross_tabulates_and_judges() {
        let rows = vec![
            row(true, 1.0, 2.0),
            row(true, 1.0, 2.0),
            row(true, 2.0, 1.0),
            row(false, 2.0, 1.0),
            row(false, 1.0, 2.0),
            row(false, 1.0, 1.0),
        ];
        let report = correlate_ma_candles(&rows);
        assert_eq!(report.green_above, 2);
        assert_eq!(report.red_above, 1);
        assert_eq!(report.green_below, 1);
        assert_eq!(report.red_below, 1);
        assert_eq!(report.doji_below, 1);

        let green_above = report.percentages.green_above.unwrap();
        assert!((green_above - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.percentages.red_below, Some(50.0));

        assert_eq!(report.verdicts.green_when_above, Verdict::Supported);
        // a tie does not support red dominance
        assert_eq!(report.verdicts.red_when_below, Verdict::NotSupported);
    }

    #[test]
    fn empty_bucket_reports_no_data() {
        let report = correlate_ma_candles(&[row(true, 1.0, 2.0), row(false, 1.0, 1.0)]);
        assert_eq!(report.percentages.green_below, None);
        assert_eq!(report.percentages.red_below, None);
        assert_eq!(report.verdicts.red_when_below, Verdict::NoData);
        assert_eq!(report.verdicts.green_when_above, Verdict::Supported);
    }

    #[test]
    fn no_rows_no_data() {
        let report = correlate_ma_candles(&[]);
        assert_eq!(report.verdicts, MaVerdicts::default());
        assert_eq!(report.percentages, MaPercentages::default());
    }
}
