//! NewsEvent and its closed label enumerations.

use super::ids::EventId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which news provider a record came from.
///
/// Selects the typed adapter in `normalize`; records are never shape-sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "news-api")]
    NewsApi,
    #[serde(rename = "finnhub")]
    Finnhub,
    #[serde(rename = "serpapi")]
    SerpApi,
    #[serde(rename = "yahoo")]
    Yahoo,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::NewsApi,
        Provider::Finnhub,
        Provider::SerpApi,
        Provider::Yahoo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::NewsApi => "news-api",
            Provider::Finnhub => "finnhub",
            Provider::SerpApi => "serpapi",
            Provider::Yahoo => "yahoo",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Provider {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| UnknownLabel {
                kind: "provider",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl FromStr for Sentiment {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "sentiment",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ProductLaunch,
    Earnings,
    MergerAcquisition,
    ManagementChange,
    Regulatory,
    Partnership,
    Legal,
    AnalystRating,
    MarketTrend,
    Innovation,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 11] = [
        EventType::ProductLaunch,
        EventType::Earnings,
        EventType::MergerAcquisition,
        EventType::ManagementChange,
        EventType::Regulatory,
        EventType::Partnership,
        EventType::Legal,
        EventType::AnalystRating,
        EventType::MarketTrend,
        EventType::Innovation,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ProductLaunch => "product_launch",
            EventType::Earnings => "earnings",
            EventType::MergerAcquisition => "merger_acquisition",
            EventType::ManagementChange => "management_change",
            EventType::Regulatory => "regulatory",
            EventType::Partnership => "partnership",
            EventType::Legal => "legal",
            EventType::AnalystRating => "analyst_rating",
            EventType::MarketTrend => "market_trend",
            EventType::Innovation => "innovation",
            EventType::Other => "other",
        }
    }
}

impl FromStr for EventType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "event type",
                value: s.to_string(),
            })
    }
}

/// A classification label pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub sentiment: Sentiment,
    pub event_type: EventType,
}

impl Default for Labels {
    /// `{neutral, other}`: the pair substituted for any failed classification.
    fn default() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            event_type: EventType::Other,
        }
    }
}

/// One market news item in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsEvent {
    /// `None` when the provider gave no URL; such events are never deduplicated.
    pub id: Option<EventId>,
    /// UTC, second precision. Absent for some providers; never defaulted to "now".
    pub occurred_at: Option<DateTime<Utc>>,
    pub headline: String,
    pub summary: String,
    /// URL as received from the provider.
    pub url: Option<String>,
    pub source_provider: Provider,
    /// Publishing outlet as reported by the provider (empty when unknown).
    pub publisher: String,
    pub sentiment: Option<Sentiment>,
    pub event_type: Option<EventType>,
}

impl NewsEvent {
    /// Date component of `occurred_at` (UTC).
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        self.occurred_at.map(|ts| ts.date_naive())
    }

    /// Copy of this event carrying the given labels.
    pub fn with_labels(&self, labels: Labels) -> Self {
        Self {
            sentiment: Some(labels.sentiment),
            event_type: Some(labels.event_type),
            ..self.clone()
        }
    }

    pub fn is_classified(&self) -> bool {
        self.sentiment.is_some() && self.event_type.is_some()
    }
}
