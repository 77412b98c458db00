//! End-to-end: ticker directories on disk -> pipeline -> artifacts on disk.
//!
//! Tests:
//! 1. Two tickers load, run in parallel and write datasets plus one report
//! 2. Classifier replay labels matched articles and defaults the rest
//! 3. A ticker with conflicting bars is reported as failed, the other completes
//! 4. A missing price file is a load error
//! 5. An unloadable ticker directory fails only that ticker

use std::fs;
use std::path::Path;

use newslab_runner::{
    load_label_table, load_ticker_dir, save_artifacts, LoadError, Pipeline, PipelineConfig,
    TickerStatus,
};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// DNA: CSV prices plus news-api and finnhub payloads sharing one article.
///
/// News files load in provider order, so the news-api sighting arrives first.
fn seed_dna(data: &Path) {
    write(
        &data.join("DNA/prices.csv"),
        "Date,Open,Close,Volume\n\
         2025-01-02,10.0,10.0,1\n\
         2025-01-03,10.0,11.0,1\n\
         2025-01-06,11.0,9.0,1\n",
    );
    write(
        &data.join("DNA/news/news-api.json"),
        r#"{"status": "ok", "articles": [
            {"source": {"name": "Reuters"}, "title": "Ginkgo weekend news",
             "description": "s1", "url": "https://www.example.com/ginkgo?utm_source=newsapi",
             "publishedAt": "2025-01-04T15:00:00Z"}
        ]}"#,
    );
    write(
        &data.join("DNA/news/finnhub.json"),
        r#"[
            {"datetime": 1736006400, "headline": "Ginkgo weekend news (dup)", "summary": "dup",
             "url": "https://WWW.EXAMPLE.COM/ginkgo", "source": "Reuters"},
            {"datetime": 1736157600, "headline": "Ginkgo monday", "summary": "s2",
             "url": "https://www.example.com/monday", "source": "Reuters"},
            {"headline": "no identity"}
        ]"#,
    );
}

/// AAPL: Alpha Vantage prices and no news directory.
fn seed_aapl(data: &Path) {
    write(
        &data.join("AAPL/prices.json"),
        r#"{"Time Series (Daily)": {
            "2025-01-02": {"1. open": "100.0", "4. close": "101.0"},
            "2025-01-03": {"1. open": "101.0", "4. close": "99.0"}
        }}"#,
    );
}

fn labels(path: &Path) {
    write(
        path,
        r#"{
            "https://www.example.com/ginkgo?utm_source=newsapi":
                "{\"sentiment\": \"positive\", \"event_type\": \"partnership\"}",
            "https://www.example.com/monday": {"sentiment": "bullish", "event_type": "other"}
        }"#,
    );
}

// ──────────────────────────────────────────────
// 1 + 2. Full run
// ──────────────────────────────────────────────

#[test]
fn full_run_writes_artifacts() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    seed_dna(&data);
    seed_aapl(&data);
    labels(&tmp.path().join("labels.json"));

    let inputs = vec![
        load_ticker_dir(&data, "DNA").unwrap(),
        load_ticker_dir(&data, "AAPL").unwrap(),
    ];
    assert_eq!(inputs[0].news.len(), 2);
    assert!(inputs[1].news.is_empty());

    let classifier = load_label_table(&tmp.path().join("labels.json")).unwrap();
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let results = pipeline.run(&inputs, &classifier);

    assert_eq!(results[0].ticker, "DNA");
    assert_eq!(results[1].ticker, "AAPL");
    assert!(results.iter().all(|r| r.status == TickerStatus::Ok));

    let dna = &results[0];
    assert_eq!(dna.counts.malformed, 1);
    assert_eq!(dna.counts.duplicates_dropped, 1);
    // "bullish" is outside the sentiment set
    assert_eq!(dna.counts.classification_failures, 1);
    assert_eq!(dna.dataset.len(), 2);

    let out = tmp.path().join("out");
    let written = save_artifacts(&results, &out).unwrap();
    assert_eq!(written.len(), 5);

    let dataset = fs::read_to_string(out.join("DNA_dataset.csv")).unwrap();
    let rows: Vec<&str> = dataset.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with("2025-01-04 15:00:00 UTC,Ginkgo weekend news,s1,"));
    assert!(rows[1].contains(",news-api,positive,partnership,10.000000,11.000000,2025-01-03,0.000000,10.000000"));
    assert!(rows[2].contains(",finnhub,neutral,other,11.000000,9.000000,2025-01-06,"));

    let features = fs::read_to_string(out.join("AAPL_features.csv")).unwrap();
    assert_eq!(features.lines().count(), 3);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    let tickers = report["tickers"].as_array().unwrap();
    assert_eq!(tickers.len(), 2);
    assert_eq!(tickers[0]["ticker"], "DNA");
    assert_eq!(tickers[0]["status"]["state"], "ok");
    assert_eq!(tickers[0]["hypotheses"]["total_breaches"], 0);
    assert!(tickers[0]["hypotheses"]["ma_correlation"]["verdicts"].is_object());
    assert_eq!(tickers[1]["hypotheses"]["latest"]["close"], 99.0);
}

// ──────────────────────────────────────────────
// 3. Structural failure is isolated
// ──────────────────────────────────────────────

#[test]
fn conflicting_prices_fail_one_ticker() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    seed_aapl(&data);
    write(
        &data.join("BAD/prices.csv"),
        "date,open,close\n2025-01-02,1,2\n2025-01-02,1,3\n",
    );

    let inputs = vec![
        load_ticker_dir(&data, "BAD").unwrap(),
        load_ticker_dir(&data, "AAPL").unwrap(),
    ];
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let classifier = newslab_core::classify::LabelTable::default();
    let results = pipeline.run(&inputs, &classifier);

    assert!(matches!(results[0].status, TickerStatus::Failed { .. }));
    assert_eq!(results[1].status, TickerStatus::Ok);

    let out = tmp.path().join("out");
    let written = save_artifacts(&results, &out).unwrap();
    assert_eq!(written.len(), 3);
    assert!(!out.join("BAD_dataset.csv").exists());
}

// ──────────────────────────────────────────────
// 4. Missing prices
// ──────────────────────────────────────────────

#[test]
fn missing_prices_is_a_load_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = load_ticker_dir(tmp.path(), "NOPE").unwrap_err();
    assert!(matches!(err, LoadError::MissingPrices { .. }), "{err}");
}

// ──────────────────────────────────────────────
// 5. Unloadable directory is isolated
// ──────────────────────────────────────────────

#[test]
fn unloadable_ticker_dir_fails_only_that_ticker() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    seed_dna(&data);
    // BAD has news but no price file; BROKEN has an undecodable one.
    write(&data.join("BAD/news/finnhub.json"), "[]");
    write(&data.join("BROKEN/prices.json"), "{not json");

    let tickers = vec!["BAD".to_string(), "DNA".to_string(), "BROKEN".to_string()];
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let classifier = newslab_core::classify::LabelTable::default();
    let results = pipeline.run_dirs(&data, &tickers, &classifier);

    let names: Vec<&str> = results.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(names, ["BAD", "DNA", "BROKEN"]);
    assert!(matches!(results[0].status, TickerStatus::Failed { .. }));
    assert_eq!(results[1].status, TickerStatus::Ok);
    assert_eq!(results[1].dataset.len(), 2);
    assert!(matches!(results[2].status, TickerStatus::Failed { .. }));

    let out = tmp.path().join("out");
    let written = save_artifacts(&results, &out).unwrap();
    assert_eq!(written.len(), 3);
    assert!(out.join("DNA_dataset.csv").exists());
    assert!(!out.join("BAD_dataset.csv").exists());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    assert_eq!(report["tickers"][0]["status"]["state"], "failed");
    assert!(report["tickers"][0]["hypotheses"].is_null());
    assert_eq!(report["tickers"][1]["status"]["state"], "ok");
}
