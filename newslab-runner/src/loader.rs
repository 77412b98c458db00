//! File loaders for provider payloads, price series and classifier replays.
//!
//! The fetchers are external; these loaders read what they saved to disk.
//! A ticker's inputs live under one directory:
//!
//! ```text
//! <data_dir>/<TICKER>/prices.csv | prices.json
//! <data_dir>/<TICKER>/news/<provider>.json   (one file per provider)
//! ```

use chrono::NaiveDate;
use newslab_core::classify::LabelTable;
use newslab_core::domain::{PriceBar, Provider};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::pipeline::{NewsBatch, TickerInput};

/// Keys under which providers wrap their record arrays.
const RECORD_ARRAY_KEYS: [&str; 4] = ["articles", "news_results", "news", "data"];

const ALPHA_VANTAGE_SERIES: &str = "Time Series (Daily)";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: unrecognized layout: {reason}")]
    UnknownLayout { path: PathBuf, reason: String },

    #[error("{path}: row {row}: {reason}")]
    BadRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("no price file for '{ticker}' in {dir}")]
    MissingPrices { ticker: String, dir: PathBuf },
}

fn read_json(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// ── News ─────────────────────────────────────────────────────────────

/// Pull the record array out of a saved provider response.
///
/// Accepts a bare array, or an object wrapping it under one of the
/// known provider keys.
pub fn extract_records(payload: Value) -> Option<Vec<Value>> {
    match payload {
        Value::Array(records) => Some(records),
        Value::Object(mut map) => RECORD_ARRAY_KEYS.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(records)) => Some(records),
            _ => None,
        }),
        _ => None,
    }
}

/// Load one provider's saved records.
pub fn load_news_file(path: &Path, provider: Provider) -> Result<NewsBatch, LoadError> {
    let payload = read_json(path)?;
    let records = extract_records(payload).ok_or_else(|| LoadError::UnknownLayout {
        path: path.to_path_buf(),
        reason: format!("expected an array or an object with one of {RECORD_ARRAY_KEYS:?}"),
    })?;
    debug!(path = %path.display(), %provider, records = records.len(), "loaded news file");
    Ok(NewsBatch { provider, records })
}

/// Load every `<provider>.json` in `dir`, in `Provider::ALL` order.
///
/// Files whose stem is not a provider tag are skipped with a warning.
pub fn load_news_dir(dir: &Path) -> Result<Vec<NewsBatch>, LoadError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut found: HashMap<Provider, PathBuf> = HashMap::new();
    for entry in entries {
        let path = entry
            .map_err(|source| LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        match stem.parse::<Provider>() {
            Ok(provider) => {
                found.insert(provider, path);
            }
            Err(_) => warn!(path = %path.display(), "skipping news file with unknown provider name"),
        }
    }

    Provider::ALL
        .iter()
        .filter_map(|p| found.get(p).map(|path| (*p, path)))
        .map(|(provider, path)| load_news_file(path, provider))
        .collect()
}

// ── Prices ───────────────────────────────────────────────────────────

/// Parse `date,open,close` CSV. Header names are case-insensitive and extra
/// columns are ignored.
pub fn parse_price_csv<R: Read>(reader: R, ticker: &str, path: &Path) -> Result<Vec<PriceBar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| LoadError::UnknownLayout {
                path: path.to_path_buf(),
                reason: format!("missing '{name}' column"),
            })
    };
    let (date_col, open_col, close_col) = (column("date")?, column("open")?, column("close")?);

    let mut bars = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let row = i + 2;
        let field = |col: usize| record.get(col).unwrap_or_default();
        let bad = |reason: String| LoadError::BadRow {
            path: path.to_path_buf(),
            row,
            reason,
        };

        let date = parse_date(field(date_col)).ok_or_else(|| bad(format!("bad date '{}'", field(date_col))))?;
        let open = field(open_col)
            .parse::<f64>()
            .map_err(|e| bad(format!("bad open: {e}")))?;
        let close = field(close_col)
            .parse::<f64>()
            .map_err(|e| bad(format!("bad close: {e}")))?;
        bars.push(PriceBar::new(ticker, date, open, close));
    }
    Ok(bars)
}

/// Parse an Alpha Vantage daily series document.
pub fn parse_alpha_vantage(doc: &Value, ticker: &str, path: &Path) -> Result<Vec<PriceBar>, LoadError> {
    let series = doc
        .get(ALPHA_VANTAGE_SERIES)
        .and_then(Value::as_object)
        .ok_or_else(|| LoadError::UnknownLayout {
            path: path.to_path_buf(),
            reason: format!("missing \"{ALPHA_VANTAGE_SERIES}\" object"),
        })?;

    let mut bars = Vec::with_capacity(series.len());
    for (row, (date, fields)) in series.iter().enumerate() {
        let bad = |reason: String| LoadError::BadRow {
            path: path.to_path_buf(),
            row,
            reason,
        };
        let date = parse_date(date).ok_or_else(|| bad(format!("bad date '{date}'")))?;
        let price = |key: &str| -> Result<f64, LoadError> {
            match fields.get(key) {
                Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|e| bad(format!("bad {key}: {e}"))),
                Some(Value::Number(n)) => n.as_f64().ok_or_else(|| bad(format!("bad {key}"))),
                _ => Err(bad(format!("missing \"{key}\""))),
            }
        };
        bars.push(PriceBar::new(ticker, date, price("1. open")?, price("4. close")?));
    }
    Ok(bars)
}

/// Load a price file, choosing the parser by extension (`.json` or CSV).
pub fn load_price_file(path: &Path, ticker: &str) -> Result<Vec<PriceBar>, LoadError> {
    let bars = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        parse_alpha_vantage(&read_json(path)?, ticker, path)?
    } else {
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_price_csv(file, ticker, path)?
    };
    debug!(path = %path.display(), ticker, bars = bars.len(), "loaded price file");
    Ok(bars)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // Some exports carry a time component; only the date matters.
    let day = s.split(['T', ' ']).next().unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

// ── Ticker directories ───────────────────────────────────────────────

/// Load `<data_dir>/<ticker>/` into a pipeline input.
pub fn load_ticker_dir(data_dir: &Path, ticker: &str) -> Result<TickerInput, LoadError> {
    let dir = data_dir.join(ticker);
    let prices = ["prices.csv", "prices.json"]
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
        .ok_or_else(|| LoadError::MissingPrices {
            ticker: ticker.to_string(),
            dir: dir.clone(),
        })?;

    Ok(TickerInput {
        ticker: ticker.to_string(),
        bars: load_price_file(&prices, ticker)?,
        news: load_news_dir(&dir.join("news"))?,
    })
}

// ── Classifier replay ────────────────────────────────────────────────

/// Load a URL → raw classifier output table.
///
/// Values may be the raw text the classifier returned or an already-decoded
/// JSON object.
pub fn load_label_table(path: &Path) -> Result<LabelTable, LoadError> {
    let doc = read_json(path)?;
    let Value::Object(map) = doc else {
        return Err(LoadError::UnknownLayout {
            path: path.to_path_buf(),
            reason: "expected an object keyed by article URL".into(),
        });
    };
    let responses = map
        .into_iter()
        .map(|(url, raw)| match raw {
            Value::String(s) => (url, s),
            other => (url, other.to_string()),
        })
        .collect();
    Ok(LabelTable::new(responses))
}
