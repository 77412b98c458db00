//! Source Record Normalizer: provider payloads into canonical `NewsEvent`s.
//!
//! Input is one provider-native JSON record plus its provider tag. Output is a
//! complete `NewsEvent` or a `NormalizeError`; a record is never half-filled.

pub mod canonical_url;
pub mod providers;
pub mod timestamp;

pub use canonical_url::{UrlCanonicalizer, DEFAULT_TRACKING_PARAMS};
pub use providers::{layout, ProviderLayout, TimestampField, TimestampKey};

use crate::domain::{EventId, NewsEvent, Provider};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a record could not be normalized (MalformedRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("unparseable timestamp at '{pointer}': {raw}")]
    BadTimestamp { pointer: String, raw: String },

    #[error("record has neither a timestamp nor a URL")]
    NoIdentity,
}

/// A dropped record and why.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    /// Position of the record in its input batch.
    pub index: usize,
    pub provider: Provider,
    pub error: NormalizeError,
}

/// Result of normalizing one provider batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub events: Vec<NewsEvent>,
    pub malformed: Vec<MalformedRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    canonicalizer: UrlCanonicalizer,
}

impl Normalizer {
    pub fn new(extra_tracking_params: Vec<String>) -> Self {
        Self {
            canonicalizer: UrlCanonicalizer::new(extra_tracking_params),
        }
    }

    pub fn canonicalizer(&self) -> &UrlCanonicalizer {
        &self.canonicalizer
    }

    /// Normalize one provider-native record.
    pub fn normalize(&self, provider: Provider, record: &Value) -> Result<NewsEvent, NormalizeError> {
        if !record.is_object() {
            return Err(NormalizeError::NotAnObject);
        }
        let layout = layout(provider);

        let occurred_at = match layout.timestamp(record) {
            TimestampField::Parsed(ts) => Some(ts),
            TimestampField::Absent => None,
            TimestampField::Invalid { pointer, raw } => {
                return Err(NormalizeError::BadTimestamp {
                    pointer: pointer.to_string(),
                    raw,
                })
            }
        };

        let url = layout.url(record).map(str::to_string);
        let id = url
            .as_deref()
            .and_then(|u| self.canonicalizer.canonicalize(u))
            .map(|canonical| EventId::from_canonical_url(&canonical));

        if occurred_at.is_none() && url.is_none() {
            return Err(NormalizeError::NoIdentity);
        }

        Ok(NewsEvent {
            id,
            occurred_at,
            headline: layout.headline(record),
            summary: layout.summary(record),
            url,
            source_provider: provider,
            publisher: layout.publisher(record),
            sentiment: None,
            event_type: None,
        })
    }

    /// Normalize a whole batch in arrival order, isolating malformed records.
    pub fn normalize_batch(&self, provider: Provider, records: &[Value]) -> NormalizedBatch {
        let mut batch = NormalizedBatch {
            events: Vec::with_capacity(records.len()),
            malformed: Vec::new(),
        };

        for (index, record) in records.iter().enumerate() {
            match self.normalize(provider, record) {
                Ok(event) => batch.events.push(event),
                Err(error) => {
                    warn!(%provider, index, %error, "dropping malformed record");
                    batch.malformed.push(MalformedRecord {
                        index,
                        provider,
                        error,
                    });
                }
            }
        }

        debug!(
            %provider,
            normalized = batch.events.len(),
            malformed = batch.malformed.len(),
            "normalized provider batch"
        );
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn finnhub_record_normalizes() {
        let record = json!({
            "category": "company",
            "datetime": 1736427600,
            "headline": "Ginkgo cuts costs",
            "summary": "Ginkgo Bioworks announced...",
            "url": "https://finnhub.io/api/news?id=abc",
            "source": "Yahoo"
        });
        let event = Normalizer::default()
            .normalize(Provider::Finnhub, &record)
            .unwrap();

        assert_eq!(event.occurred_at, Some(Utc.timestamp_opt(1736427600, 0).unwrap()));
        assert_eq!(event.headline, "Ginkgo cuts costs");
        assert_eq!(event.publisher, "Yahoo");
        assert_eq!(event.source_provider, Provider::Finnhub);
        assert!(event.id.is_some());
        assert!(event.sentiment.is_none());
    }

    #[test]
    fn news_api_record_normalizes() {
        let record = json!({
            "source": {"id": null, "name": "The Verge"},
            "title": "Apple ships a thing",
            "description": null,
            "content": "Body text",
            "url": "https://www.theverge.com/apple?utm_source=newsapi",
            "publishedAt": "2025-03-04T15:00:00Z"
        });
        let event = Normalizer::default()
            .normalize(Provider::NewsApi, &record)
            .unwrap();

        assert_eq!(event.summary, "Body text");
        assert_eq!(event.publisher, "The Verge");
        assert_eq!(
            event.occurred_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 4, 15, 0, 0).unwrap())
        );
    }

    #[test]
    fn tracking_params_do_not_change_identity() {
        let n = Normalizer::default();
        let a = n
            .normalize(Provider::Finnhub, &json!({"url": "https://x.com/a?utm_source=1"}))
            .unwrap();
        let b = n
            .normalize(Provider::Yahoo, &json!({"link": "HTTPS://X.COM/a"}))
            .unwrap();
        assert_eq!(a.id, b.id);
        // Original URLs are kept for output.
        assert_ne!(a.url, b.url);
    }

    #[test]
    fn missing_timestamp_is_none_not_now() {
        let event = Normalizer::default()
            .normalize(Provider::Finnhub, &json!({"url": "https://x.com/a"}))
            .unwrap();
        assert_eq!(event.occurred_at, None);
    }

    #[test]
    fn no_timestamp_and_no_url_is_malformed() {
        let err = Normalizer::default()
            .normalize(Provider::Finnhub, &json!({"headline": "orphan"}))
            .unwrap_err();
        assert_eq!(err, NormalizeError::NoIdentity);
    }

    #[test]
    fn undated_record_without_url_but_with_time_is_kept() {
        let event = Normalizer::default()
            .normalize(Provider::Finnhub, &json!({"datetime": 1736427600}))
            .unwrap();
        assert!(event.id.is_none());
        assert!(event.url.is_none());
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let err = Normalizer::default()
            .normalize(
                Provider::NewsApi,
                &json!({"publishedAt": "Tuesday", "url": "https://x.com/a"}),
            )
            .unwrap_err();
        assert!(matches!(err, NormalizeError::BadTimestamp { .. }));
    }

    #[test]
    fn non_object_is_malformed() {
        let err = Normalizer::default()
            .normalize(Provider::Yahoo, &json!(["not", "a", "record"]))
            .unwrap_err();
        assert_eq!(err, NormalizeError::NotAnObject);
    }

    #[test]
    fn batch_isolates_malformed_records() {
        let records = vec![
            json!({"datetime": 1736427600, "url": "https://x.com/1"}),
            json!({"headline": "no identity"}),
            json!({"datetime": 1736514000, "url": "https://x.com/2"}),
        ];
        let batch = Normalizer::default().normalize_batch(Provider::Finnhub, &records);
        assert_eq!(batch.events.len(), 2);
        assert_eq!(batch.malformed.len(), 1);
        assert_eq!(batch.malformed[0].index, 1);
        assert_eq!(batch.events[1].url.as_deref(), Some("https://x.com/2"));
    }
}
