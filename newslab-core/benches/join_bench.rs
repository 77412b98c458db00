//! Criterion benchmarks for the pipeline hot paths.
//!
//! Benchmarks:
//! 1. Fallback lookup against a multi-year store
//! 2. Batch join of a large event set
//! 3. Feature precompute over a long price series
//! 4. Dedup of a batch heavy with repeats

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use newslab_core::dedup::dedup_first_seen;
use newslab_core::domain::{EventId, NewsEvent, PriceBar, Provider};
use newslab_core::features::FeatureEngine;
use newslab_core::join::join_events;
use newslab_core::store::PriceSeriesStore;

// ── Helpers ──────────────────────────────────────────────────────────

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()
}

/// Weekday-only bars.
fn make_bars(n: usize) -> Vec<PriceBar> {
    (0..n * 7 / 5)
        .map(|i| base_date() + chrono::Duration::days(i as i64))
        .filter(|d| d.weekday().number_from_monday() <= 5)
        .take(n)
        .enumerate()
        .map(|(i, date)| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar::new("BENCH", date, close - 0.3, close)
        })
        .collect()
}

fn make_events(n: usize, distinct_urls: usize) -> Vec<NewsEvent> {
    let start = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap().timestamp();
    (0..n)
        .map(|i| {
            let url = format!("https://news.example.com/{}", i % distinct_urls);
            NewsEvent {
                id: Some(EventId::from_canonical_url(&url)),
                occurred_at: Utc.timestamp_opt(start + (i as i64 * 7919) % 63_072_000, 0).single(),
                headline: String::new(),
                summary: String::new(),
                url: Some(url),
                source_provider: Provider::Finnhub,
                publisher: String::new(),
                sentiment: None,
                event_type: None,
            }
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_fallback_lookup(c: &mut Criterion) {
    let store = PriceSeriesStore::load("BENCH", make_bars(2520)).unwrap();
    let mut group = c.benchmark_group("fallback_lookup");

    group.bench_function("730_days", |b| {
        b.iter(|| {
            for offset in 0..730 {
                let day = base_date() + chrono::Duration::days(offset);
                black_box(store.get_with_fallback(black_box(day)));
            }
        })
    });

    group.finish();
}

fn bench_join(c: &mut Criterion) {
    let store = PriceSeriesStore::load("BENCH", make_bars(2520)).unwrap();
    let mut group = c.benchmark_group("join_events");

    for n in [1_000usize, 10_000] {
        let events = make_events(n, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &events, |b, events| {
            b.iter(|| join_events(black_box(events), &store))
        });
    }

    group.finish();
}

fn bench_features(c: &mut Criterion) {
    let bars = make_bars(2520);
    let engine = FeatureEngine::default();
    let mut group = c.benchmark_group("price_features");

    group.bench_function("2520_bars", |b| {
        b.iter(|| engine.price_features(black_box(&bars)))
    });

    group.finish();
}

fn bench_dedup(c: &mut Criterion) {
    let events = make_events(10_000, 2_500);
    let mut group = c.benchmark_group("dedup");

    group.bench_function("10000_events_4x_repeats", |b| {
        b.iter(|| dedup_first_seen(black_box(events.clone())))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_fallback_lookup,
    bench_join,
    bench_features,
    bench_dedup,
);
criterion_main!(benches);
