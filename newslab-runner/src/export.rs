//! Reporting and export: dataset CSV, feature CSV, and the JSON report.
//!
//! Missing prices and undefined values are written as empty cells, never as
//! zero or NaN. Returns are percentages.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use newslab_core::features::{FeatureRow, JoinedFeatureRow};
use newslab_core::hypothesis::HypothesisReport;

use crate::pipeline::{SoftFailureCounts, TickerResult, TickerStatus};

/// Current schema version for the JSON report.
pub const SCHEMA_VERSION: u32 = 1;

const DATASET_COLUMNS: [&str; 12] = [
    "Datetime",
    "Headline",
    "Summary",
    "URL",
    "Source",
    "Sentiment",
    "EventType",
    "Open",
    "Close",
    "Price Date",
    "Close_Return",
    "Intraday_Return",
];

const FEATURE_COLUMNS: [&str; 13] = [
    "Date",
    "Open",
    "Close",
    "MA_Short",
    "MA_Long",
    "MA_Band",
    "Rolling_Std",
    "BB_Upper",
    "BB_Lower",
    "Close_Return",
    "Intraday_Return",
    "Candle",
    "MA_Above",
];

fn num(v: f64) -> String {
    format!("{v:.6}")
}

fn opt(v: Option<f64>) -> String {
    v.map(num).unwrap_or_default()
}

// ─── CSV export ─────────────────────────────────────────────────────

/// The joined news/price dataset, one row per event.
pub fn export_dataset_csv(rows: &[JoinedFeatureRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(DATASET_COLUMNS)?;

    for row in rows {
        let event = &row.record.event;
        let price = row.record.price;
        wtr.write_record([
            event
                .occurred_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_default(),
            event.headline.clone(),
            event.summary.clone(),
            event.url.clone().unwrap_or_default(),
            event.source_provider.to_string(),
            event.sentiment.map(|s| s.as_str().to_string()).unwrap_or_default(),
            event.event_type.map(|t| t.as_str().to_string()).unwrap_or_default(),
            opt(price.map(|p| p.open)),
            opt(price.map(|p| p.close)),
            price.map(|p| p.price_date.to_string()).unwrap_or_default(),
            opt(row.close_return),
            opt(row.intraday_return),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// The price series with its rolling indicators.
pub fn export_features_csv(rows: &[FeatureRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(FEATURE_COLUMNS)?;

    for r in rows {
        wtr.write_record([
            r.trade_date.to_string(),
            num(r.open),
            num(r.close),
            num(r.ma_short),
            num(r.ma_long),
            num(r.ma_band),
            opt(r.rolling_std),
            opt(r.bb_upper),
            opt(r.bb_lower),
            opt(r.close_return),
            opt(r.intraday_return),
            r.candle.as_str().to_string(),
            r.ma_above.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON report ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerReport {
    pub ticker: String,
    pub status: TickerStatus,
    pub counts: SoftFailureCounts,
    pub bars: usize,
    pub events: usize,
    /// Absent for failed tickers, so a failure never reads as zero breaches.
    pub hypotheses: Option<HypothesisReport>,
}

impl From<&TickerResult> for TickerReport {
    fn from(r: &TickerResult) -> Self {
        Self {
            ticker: r.ticker.clone(),
            status: r.status.clone(),
            counts: r.counts,
            bars: r.bar_count,
            events: r.dataset.len(),
            hypotheses: r.report.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub schema_version: u32,
    pub generated_at: String,
    pub tickers: Vec<TickerReport>,
}

impl RunReport {
    pub fn new(results: &[TickerResult]) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            tickers: results.iter().map(TickerReport::from).collect(),
        }
    }
}

pub fn export_report_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write every artifact for a run under `output_dir`:
/// - `report.json`, covering all tickers
/// - `{ticker}_dataset.csv` and `{ticker}_features.csv` for each ticker
///   that completed
///
/// Returns the paths written.
pub fn save_artifacts(results: &[TickerResult], output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let mut written = Vec::new();
    let mut write = |name: String, content: String| -> Result<()> {
        let path = output_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
        Ok(())
    };

    for result in results.iter().filter(|r| r.status.is_ok()) {
        write(
            format!("{}_dataset.csv", result.ticker),
            export_dataset_csv(&result.dataset)?,
        )?;
        write(
            format!("{}_features.csv", result.ticker),
            export_features_csv(&result.features)?,
        )?;
    }
    write(
        "report.json".to_string(),
        export_report_json(&RunReport::new(results))?,
    )?;

    Ok(written)
}
