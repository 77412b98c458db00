//! Classification contract for the external event classifier.
//!
//! The classifier is a black box `summary -> (sentiment, event_type)`. Its
//! answer is an explicit `ClassificationOutcome`; the `{neutral, other}`
//! default is applied once, in `classify_batch`, and nowhere else.

use crate::domain::{EventType, Labels, NewsEvent, Sentiment};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// What the classifier returned for one summary.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Labelled(Labels),
    Failed(String),
}

/// External classifier seam.
///
/// The contract is `summary -> (sentiment, event_type)`: a model-backed
/// implementation reads only `event.summary`. The whole event is passed so
/// replay classifiers such as `LabelTable` can key on the URL; no
/// implementation may read labels already set on the event.
///
/// Implementations may call out to a model; rate limiting and retries are the
/// implementation's concern, not the pipeline's.
pub trait Classifier: Send + Sync {
    fn classify(&self, event: &NewsEvent) -> ClassificationOutcome;
}

impl<F> Classifier for F
where
    F: Fn(&NewsEvent) -> ClassificationOutcome + Send + Sync,
{
    fn classify(&self, event: &NewsEvent) -> ClassificationOutcome {
        self(event)
    }
}

#[derive(Deserialize)]
struct RawLabels {
    sentiment: Option<String>,
    event_type: Option<String>,
}

/// Decode raw classifier text: a JSON object with `sentiment` and `event_type`.
///
/// Any decode error, missing field, or value outside the closed enumerations
/// is a failure.
pub fn parse_classifier_output(raw: &str) -> ClassificationOutcome {
    let parsed: RawLabels = match serde_json::from_str(raw.trim()) {
        Ok(v) => v,
        Err(e) => return ClassificationOutcome::Failed(format!("invalid JSON: {e}")),
    };

    let sentiment = match parsed.sentiment.as_deref().map(str::parse::<Sentiment>) {
        Some(Ok(s)) => s,
        Some(Err(e)) => return ClassificationOutcome::Failed(e.to_string()),
        None => return ClassificationOutcome::Failed("missing sentiment".into()),
    };
    let event_type = match parsed.event_type.as_deref().map(str::parse::<EventType>) {
        Some(Ok(t)) => t,
        Some(Err(e)) => return ClassificationOutcome::Failed(e.to_string()),
        None => return ClassificationOutcome::Failed("missing event_type".into()),
    };

    ClassificationOutcome::Labelled(Labels {
        sentiment,
        event_type,
    })
}

/// Replays precomputed raw classifier responses keyed by article URL.
///
/// Events with no URL or no entry in the table fail classification.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    responses: HashMap<String, String>,
}

impl LabelTable {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self { responses }
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl Classifier for LabelTable {
    fn classify(&self, event: &NewsEvent) -> ClassificationOutcome {
        let Some(url) = event.url.as_deref() else {
            return ClassificationOutcome::Failed("event has no URL".into());
        };
        match self.responses.get(url) {
            Some(raw) => parse_classifier_output(raw),
            None => ClassificationOutcome::Failed(format!("no classifier response for {url}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedBatch {
    /// Every input event, in order, now carrying labels.
    pub events: Vec<NewsEvent>,
    pub failures: usize,
}

/// Label every event; failures get `Labels::default()` and are counted.
pub fn classify_batch(events: &[NewsEvent], classifier: &dyn Classifier) -> ClassifiedBatch {
    let mut failures = 0;
    let labelled = events
        .iter()
        .map(|event| {
            let labels = match classifier.classify(event) {
                ClassificationOutcome::Labelled(labels) => labels,
                ClassificationOutcome::Failed(reason) => {
                    warn!(url = event.url.as_deref().unwrap_or(""), %reason, "classification failed, using defaults");
                    failures += 1;
                    Labels::default()
                }
            };
            event.with_labels(labels)
        })
        .collect::<Vec<_>>();

    debug!(classified = labelled.len(), failures, "classified events");
    ClassifiedBatch {
        events: labelled,
        failures,
    }
}
