//! Per-provider field layouts.
//!
//! One typed layout per `Provider`, selected by tag. Each field lists its
//! JSON pointers in priority order; the first non-empty value wins.

use crate::domain::Provider;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::timestamp::{parse_epoch, parse_iso8601, parse_serp_date};

/// Where a timestamp lives and how it is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampKey {
    Iso8601(&'static str),
    EpochSeconds(&'static str),
    SerpDate(&'static str),
}

impl TimestampKey {
    pub fn pointer(&self) -> &'static str {
        match self {
            TimestampKey::Iso8601(p) | TimestampKey::EpochSeconds(p) | TimestampKey::SerpDate(p) => p,
        }
    }

    fn parse(&self, value: &Value) -> Option<DateTime<Utc>> {
        match self {
            TimestampKey::Iso8601(_) => value.as_str().and_then(parse_iso8601),
            TimestampKey::EpochSeconds(_) => parse_epoch(value),
            TimestampKey::SerpDate(_) => value.as_str().and_then(parse_serp_date),
        }
    }
}

#[derive(Debug)]
pub struct ProviderLayout {
    pub timestamps: &'static [TimestampKey],
    pub urls: &'static [&'static str],
    pub headlines: &'static [&'static str],
    pub summaries: &'static [&'static str],
    pub publishers: &'static [&'static str],
}

const NEWS_API: ProviderLayout = ProviderLayout {
    timestamps: &[TimestampKey::Iso8601("/publishedAt")],
    urls: &["/url"],
    headlines: &["/title"],
    summaries: &["/description", "/content"],
    publishers: &["/source/name"],
};

const FINNHUB: ProviderLayout = ProviderLayout {
    timestamps: &[TimestampKey::EpochSeconds("/datetime")],
    urls: &["/url"],
    headlines: &["/headline"],
    summaries: &["/summary"],
    publishers: &["/source"],
};

const SERPAPI: ProviderLayout = ProviderLayout {
    timestamps: &[TimestampKey::SerpDate("/date")],
    urls: &["/link"],
    headlines: &["/title"],
    summaries: &["/story", "/snippet"],
    publishers: &["/source/name", "/source"],
};

const YAHOO: ProviderLayout = ProviderLayout {
    timestamps: &[
        TimestampKey::Iso8601("/content/pubDate"),
        TimestampKey::EpochSeconds("/providerPublishTime"),
    ],
    urls: &[
        "/content/clickThroughUrl/url",
        "/content/canonicalUrl/url",
        "/link",
    ],
    headlines: &["/content/title", "/title"],
    summaries: &["/content/summary", "/summary"],
    publishers: &["/content/provider/displayName", "/publisher"],
};

pub fn layout(provider: Provider) -> &'static ProviderLayout {
    match provider {
        Provider::NewsApi => &NEWS_API,
        Provider::Finnhub => &FINNHUB,
        Provider::SerpApi => &SERPAPI,
        Provider::Yahoo => &YAHOO,
    }
}

/// Outcome of timestamp resolution for one record.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampField {
    Absent,
    Parsed(DateTime<Utc>),
    /// The highest-priority present key did not parse.
    Invalid { pointer: &'static str, raw: String },
}

impl ProviderLayout {
    /// Resolve the timestamp from the first present key.
    ///
    /// A present-but-unparseable value is reported as `Invalid`; lower-priority
    /// keys are not consulted in that case.
    pub fn timestamp(&self, record: &Value) -> TimestampField {
        for key in self.timestamps {
            let Some(value) = record.pointer(key.pointer()) else {
                continue;
            };
            if is_blank(value) {
                continue;
            }
            return match key.parse(value) {
                Some(ts) => TimestampField::Parsed(ts),
                None => TimestampField::Invalid {
                    pointer: key.pointer(),
                    raw: render(value),
                },
            };
        }
        TimestampField::Absent
    }

    pub fn url<'a>(&self, record: &'a Value) -> Option<&'a str> {
        first_text(record, self.urls)
    }

    pub fn headline(&self, record: &Value) -> String {
        first_text(record, self.headlines).unwrap_or_default().to_string()
    }

    pub fn summary(&self, record: &Value) -> String {
        first_text(record, self.summaries).unwrap_or_default().to_string()
    }

    pub fn publisher(&self, record: &Value) -> String {
        first_text(record, self.publishers).unwrap_or_default().to_string()
    }
}

fn first_text<'a>(record: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers
        .iter()
        .filter_map(|p| record.pointer(p).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
