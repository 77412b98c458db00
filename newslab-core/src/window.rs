//! Date-window filtering of news events.

use crate::domain::NewsEvent;
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowedEvents {
    pub events: Vec<NewsEvent>,
    /// Dated events outside `[start, end]`.
    pub out_of_window: usize,
    /// Undated events, kept because their placement cannot be decided.
    pub undated_kept: usize,
}

/// Keep events whose UTC date lies in `[start, end]`, plus all undated events.
/// Order is preserved.
pub fn filter_window(events: Vec<NewsEvent>, start: NaiveDate, end: NaiveDate) -> WindowedEvents {
    let mut out = WindowedEvents::default();
    for event in events {
        match event.occurred_on() {
            Some(day) if day < start || day > end => out.out_of_window += 1,
            Some(_) => out.events.push(event),
            None => {
                out.undated_kept += 1;
                out.events.push(event);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Provider;
    use chrono::{TimeZone, Utc};

    fn event_on(day: Option<(i32, u32, u32)>) -> NewsEvent {
        NewsEvent {
            id: None,
            occurred_at: day.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 23, 59, 59).unwrap()),
            headline: String::new(),
            summary: String::new(),
            url: None,
            source_provider: Provider::Yahoo,
            publisher: String::new(),
            sentiment: None,
            event_type: None,
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let events = vec![
            event_on(Some((2024, 12, 31))),
            event_on(Some((2025, 1, 1))),
            event_on(Some((2025, 1, 31))),
            event_on(Some((2025, 2, 1))),
            event_on(None),
        ];
        let out = filter_window(events, start, end);
        assert_eq!(out.events.len(), 3);
        assert_eq!(out.out_of_window, 2);
        assert_eq!(out.undated_kept, 1);
    }
}
