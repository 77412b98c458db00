//! Deduplicator: one event per identity, first sighting wins.
//!
//! Arrival order is fetch order. An earlier fetch is taken to be closer to the
//! original wire report, so later sightings of the same `EventId` are dropped
//! along with whatever metadata they carry.
//!
//! Events without an `EventId` (no usable URL) cannot be matched against
//! anything and are always kept, each on its own.

use crate::domain::NewsEvent;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    pub events: Vec<NewsEvent>,
    /// Later sightings of an already-seen id.
    pub duplicates_dropped: usize,
    /// Events kept without an id.
    pub unidentified_kept: usize,
}

/// Keep the first event for each id, preserving arrival order.
pub fn dedup_first_seen(events: Vec<NewsEvent>) -> DedupOutcome {
    let mut seen = HashSet::with_capacity(events.len());
    let mut outcome = DedupOutcome {
        events: Vec::with_capacity(events.len()),
        ..DedupOutcome::default()
    };

    for event in events {
        match &event.id {
            Some(id) => {
                if !seen.insert(id.clone()) {
                    outcome.duplicates_dropped += 1;
                    continue;
                }
            }
            None => outcome.unidentified_kept += 1,
        }
        outcome.events.push(event);
    }

    debug!(
        kept = outcome.events.len(),
        dropped = outcome.duplicates_dropped,
        unidentified = outcome.unidentified_kept,
        "deduplicated events"
    );
    outcome
}

/// Stable sort for presentation: newest first, undated events last.
///
/// Events with equal or missing timestamps keep their relative order.
pub fn sort_newest_first(events: &mut [NewsEvent]) {
    events.sort_by_key(|e| (e.occurred_at.is_none(), Reverse(e.occurred_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventId, Provider};
    use chrono::{TimeZone, Utc};

    fn event(url: Option<&str>, secs: Option<i64>, headline: &str) -> NewsEvent {
        NewsEvent {
            id: url.map(EventId::from_canonical_url),
            occurred_at: secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            headline: headline.into(),
            summary: String::new(),
            url: url.map(str::to_string),
            source_provider: Provider::Finnhub,
            publisher: String::new(),
            sentiment: None,
            event_type: None,
        }
    }

    #[test]
    fn first_seen_wins() {
        let events = vec![
            event(Some("a"), Some(100), "first"),
            event(Some("a"), Some(200), "second"),
        ];
        let out = dedup_first_seen(events);
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.events[0].headline, "first");
        assert_eq!(out.events[0].occurred_at.unwrap().timestamp(), 100);
        assert_eq!(out.duplicates_dropped, 1);
    }

    #[test]
    fn unidentified_events_are_never_merged() {
        let events = vec![
            event(None, Some(100), "x"),
            event(None, Some(100), "x"),
            event(Some("b"), None, "y"),
        ];
        let out = dedup_first_seen(events);
        assert_eq!(out.events.len(), 3);
        assert_eq!(out.unidentified_kept, 2);
        assert_eq!(out.duplicates_dropped, 0);
    }

    #[test]
    fn arrival_order_is_preserved() {
        let events = vec![
            event(Some("c"), Some(300), "c"),
            event(Some("a"), Some(100), "a"),
            event(Some("c"), Some(50), "c-late"),
            event(Some("b"), Some(200), "b"),
        ];
        let out = dedup_first_seen(events);
        let heads: Vec<_> = out.events.iter().map(|e| e.headline.as_str()).collect();
        assert_eq!(heads, ["c", "a", "b"]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let events = vec![
            event(Some("a"), Some(1), "a"),
            event(Some("a"), Some(2), "a2"),
            event(None, None, "n"),
            event(Some("b"), Some(3), "b"),
        ];
        let once = dedup_first_seen(events);
        let twice = dedup_first_seen(once.events.clone());
        assert_eq!(once.events, twice.events);
        assert_eq!(twice.duplicates_dropped, 0);
    }

    #[test]
    fn newest_first_is_stable_and_puts_undated_last() {
        let mut events = vec![
            event(Some("u1"), None, "undated-1"),
            event(Some("a"), Some(100), "old"),
            event(Some("b"), Some(300), "tie-1"),
            event(Some("c"), Some(300), "tie-2"),
            event(Some("u2"), None, "undated-2"),
        ];
        sort_newest_first(&mut events);
        let heads: Vec<_> = events.iter().map(|e| e.headline.as_str()).collect();
        assert_eq!(heads, ["tie-1", "tie-2", "old", "undated-1", "undated-2"]);
    }
}
