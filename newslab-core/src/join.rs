//! Event-Price Joiner: attach each event to its trading-day bar.
//!
//! Only the UTC date of `occurred_at` is used; intraday timing is not
//! resolved at daily-bar granularity. Each event costs exactly one
//! `get_with_fallback` lookup against the store.

use crate::domain::{JoinedRecord, NewsEvent, PriceQuote};
use crate::store::PriceSeriesStore;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinOutcome {
    /// One record per input event, same order.
    pub records: Vec<JoinedRecord>,
    /// Dated events with no bar on or before their date.
    pub lookup_misses: usize,
    /// Events with no `occurred_at`, passed through unpriced.
    pub undated: usize,
}

/// Price a single event. `None` for undated events and lookup misses.
pub fn price_event(event: &NewsEvent, store: &PriceSeriesStore) -> Option<PriceQuote> {
    let day = event.occurred_on()?;
    let bar = store.get_with_fallback(day)?;
    debug_assert!(bar.trade_date <= day, "joined to a future bar");
    Some(PriceQuote {
        open: bar.open,
        close: bar.close,
        price_date: bar.trade_date,
    })
}

/// Join every event to `store`, one record per event, in input order.
pub fn join_events(events: &[NewsEvent], store: &PriceSeriesStore) -> JoinOutcome {
    let mut outcome = JoinOutcome {
        records: Vec::with_capacity(events.len()),
        ..JoinOutcome::default()
    };

    for event in events {
        let price = match event.occurred_on() {
            None => {
                outcome.undated += 1;
                None
            }
            Some(day) => {
                let quote = price_event(event, store);
                if quote.is_none() {
                    warn!(ticker = store.ticker(), %day, "no bar on or before event date");
                    outcome.lookup_misses += 1;
                }
                quote
            }
        };
        outcome.records.push(JoinedRecord {
            event: event.clone(),
            price,
        });
    }

    debug!(
        ticker = store.ticker(),
        joined = outcome.records.len(),
        misses = outcome.lookup_misses,
        undated = outcome.undated,
        "joined events to prices"
    );
    outcome
}
