//! Date-range paging plan for fetchers that page by window.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("interval must be at least one day")]
    ZeroInterval,

    #[error("start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// One inclusive fetch window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Split `[start, end]` into consecutive, non-overlapping inclusive windows
/// of at most `interval_days` days. The last window is clipped to `end`.
pub fn plan_fetch_windows(
    start: NaiveDate,
    end: NaiveDate,
    interval_days: u32,
) -> Result<Vec<FetchWindow>, PlanError> {
    if interval_days == 0 {
        return Err(PlanError::ZeroInterval);
    }
    if start > end {
        return Err(PlanError::InvertedRange { start, end });
    }

    let step = Duration::days(i64::from(interval_days));
    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let window_end = (cursor + step - Duration::days(1)).min(end);
        windows.push(FetchWindow {
            start: cursor,
            end: window_end,
        });
        cursor = window_end + Duration::days(1);
    }
    Ok(windows)
}
