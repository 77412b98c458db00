//! Bollinger band breach detection.

use crate::features::FeatureRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachDirection {
    Above,
    Below,
}

/// One breaching row, identified by series index and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breach {
    pub index: usize,
    pub date: NaiveDate,
    pub direction: BreachDirection,
    pub close: f64,
    /// The band that was crossed.
    pub bound: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandBreachReport {
    pub total_breaches: usize,
    pub breaches_above: usize,
    pub breaches_below: usize,
    /// Breaching rows in series order.
    pub breach_row_ids: Vec<Breach>,
    /// Rows whose band was undefined (fewer than two points in the window).
    pub rows_without_band: usize,
}

/// Flag rows closing strictly outside their bands.
///
/// A row with an undefined bound can never breach on that side.
pub fn detect_band_breaches(rows: &[FeatureRow]) -> BandBreachReport {
    let mut report = BandBreachReport::default();

    for row in rows {
        if row.bb_upper.is_none() && row.bb_lower.is_none() {
            report.rows_without_band += 1;
            continue;
        }

        let breach = match (row.bb_upper, row.bb_lower) {
            (Some(upper), _) if row.close > upper => Some((BreachDirection::Above, upper)),
            (_, Some(lower)) if row.close < lower => Some((BreachDirection::Below, lower)),
            _ => None,
        };

        if let Some((direction, bound)) = breach {
            match direction {
                BreachDirection::Above => report.breaches_above += 1,
                BreachDirection::Below => report.breaches_below += 1,
            }
            report.breach_row_ids.push(Breach {
                index: row.index,
                date: row.trade_date,
                direction,
                close: row.close,
                bound,
            });
        }
    }

    report.total_breaches = report.breaches_above + report.breaches_below;
    report
}
