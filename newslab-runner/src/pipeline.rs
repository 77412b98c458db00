//! Pipeline orchestration: the core stages wired together per ticker.
//!
//! Stage order per ticker:
//! normalize -> dedup -> window filter -> classify -> sort -> join ->
//! return features, and independently price features -> evaluate.
//!
//! Per-record failures are counted in `SoftFailureCounts` and never stop a
//! ticker. Structural failures (unloadable or conflicting price series) mark
//! the ticker `Failed` with a reason; other tickers are unaffected.

use std::path::Path;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use newslab_core::classify::{classify_batch, Classifier};
use newslab_core::dedup::{dedup_first_seen, sort_newest_first};
use newslab_core::domain::{NewsEvent, PriceBar, Provider};
use newslab_core::features::{FeatureEngine, FeatureRow, JoinedFeatureRow};
use newslab_core::hypothesis::{evaluate, HypothesisReport};
use newslab_core::join::join_events;
use newslab_core::normalize::Normalizer;
use newslab_core::store::PriceSeriesStore;
use newslab_core::window::filter_window;

use crate::config::{ConfigError, PipelineConfig};
use crate::loader::load_ticker_dir;

/// One provider's records, in fetch order.
#[derive(Debug, Clone)]
pub struct NewsBatch {
    pub provider: Provider,
    pub records: Vec<Value>,
}

/// Everything the pipeline needs for one ticker.
#[derive(Debug, Clone)]
pub struct TickerInput {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
    /// Batches in arrival order; earlier batches win dedup.
    pub news: Vec<NewsBatch>,
}

/// Per-record failures, isolated and counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftFailureCounts {
    pub malformed: usize,
    pub duplicates_dropped: usize,
    pub unidentified_kept: usize,
    pub out_of_window: usize,
    pub classification_failures: usize,
    pub lookup_misses: usize,
    pub undated: usize,
}

impl SoftFailureCounts {
    pub fn merge(&mut self, other: &SoftFailureCounts) {
        self.malformed += other.malformed;
        self.duplicates_dropped += other.duplicates_dropped;
        self.unidentified_kept += other.unidentified_kept;
        self.out_of_window += other.out_of_window;
        self.classification_failures += other.classification_failures;
        self.lookup_misses += other.lookup_misses;
        self.undated += other.undated;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TickerStatus {
    Ok,
    Failed { reason: String },
}

impl TickerStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, TickerStatus::Ok)
    }
}

/// Output of the news half of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PreparedNews {
    /// Deduplicated, labelled, newest first.
    pub events: Vec<NewsEvent>,
    pub counts: SoftFailureCounts,
}

#[derive(Debug, Clone)]
pub struct TickerResult {
    pub ticker: String,
    pub status: TickerStatus,
    pub counts: SoftFailureCounts,
    pub bar_count: usize,
    /// Joined dataset with return columns, ordered by price date.
    pub dataset: Vec<JoinedFeatureRow>,
    pub features: Vec<FeatureRow>,
    /// `None` when the ticker failed structurally.
    pub report: Option<HypothesisReport>,
}

impl TickerResult {
    fn failed(ticker: &str, counts: SoftFailureCounts, bar_count: usize, reason: String) -> Self {
        error!(ticker, %reason, "ticker failed");
        Self {
            ticker: ticker.to_string(),
            status: TickerStatus::Failed { reason },
            counts,
            bar_count,
            dataset: Vec::new(),
            features: Vec::new(),
            report: None,
        }
    }
}

/// Inclusive UTC date range for news filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    engine: FeatureEngine,
    date_range: Option<DateRange>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine =
            FeatureEngine::new(config.features).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(Self {
            normalizer: Normalizer::new(config.normalize.extra_tracking_params.clone()),
            engine,
            config,
            date_range: None,
        })
    }

    /// Keep only news dated within `range` (undated news is always kept).
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalize, dedup, filter, classify and sort one ticker's news.
    pub fn prepare_news(&self, batches: &[NewsBatch], classifier: &dyn Classifier) -> PreparedNews {
        let mut counts = SoftFailureCounts::default();

        let mut arrivals = Vec::new();
        for batch in batches {
            let normalized = self.normalizer.normalize_batch(batch.provider, &batch.records);
            counts.malformed += normalized.malformed.len();
            arrivals.extend(normalized.events);
        }

        let deduped = dedup_first_seen(arrivals);
        counts.duplicates_dropped = deduped.duplicates_dropped;
        counts.unidentified_kept = deduped.unidentified_kept;

        let events = match self.date_range {
            Some(range) => {
                let windowed = filter_window(deduped.events, range.start, range.end);
                counts.out_of_window = windowed.out_of_window;
                windowed.events
            }
            None => deduped.events,
        };

        let classified = classify_batch(&events, classifier);
        counts.classification_failures = classified.failures;

        let mut events = classified.events;
        sort_newest_first(&mut events);

        info!(
            events = events.len(),
            malformed = counts.malformed,
            duplicates = counts.duplicates_dropped,
            classification_failures = counts.classification_failures,
            "prepared news"
        );
        PreparedNews { events, counts }
    }

    /// Price features and hypothesis report for a bar series alone.
    pub fn evaluate_prices(&self, ticker: &str, bars: Vec<PriceBar>) -> TickerResult {
        let bar_count = bars.len();
        let store = match PriceSeriesStore::load(ticker, bars) {
            Ok(store) => store,
            Err(e) => {
                return TickerResult::failed(ticker, SoftFailureCounts::default(), bar_count, e.to_string())
            }
        };
        self.evaluate_store(&store, SoftFailureCounts::default(), Vec::new())
    }

    /// Run the full pipeline for one ticker.
    pub fn run_ticker(&self, input: &TickerInput, classifier: &dyn Classifier) -> TickerResult {
        let _span = tracing::info_span!("ticker", ticker = %input.ticker).entered();

        let prepared = self.prepare_news(&input.news, classifier);
        let mut counts = prepared.counts;

        let store = match PriceSeriesStore::load(&input.ticker, input.bars.clone()) {
            Ok(store) => store,
            Err(e) => return TickerResult::failed(&input.ticker, counts, input.bars.len(), e.to_string()),
        };

        let joined = join_events(&prepared.events, &store);
        counts.lookup_misses = joined.lookup_misses;
        counts.undated = joined.undated;

        let dataset = match self.engine.return_features(&joined.records) {
            Ok(rows) => rows,
            Err(e) => return TickerResult::failed(&input.ticker, counts, store.len(), e.to_string()),
        };

        self.evaluate_store(&store, counts, dataset)
    }

    fn evaluate_store(
        &self,
        store: &PriceSeriesStore,
        counts: SoftFailureCounts,
        dataset: Vec<JoinedFeatureRow>,
    ) -> TickerResult {
        let features = match self.engine.price_features(store.bars()) {
            Ok(rows) => rows,
            Err(e) => return TickerResult::failed(store.ticker(), counts, store.len(), e.to_string()),
        };
        let report = evaluate(&features, self.config.evaluation.window);
        debug!(
            ticker = store.ticker(),
            breaches = report.bands.total_breaches,
            rows = report.rows_evaluated,
            "evaluated hypotheses"
        );

        TickerResult {
            ticker: store.ticker().to_string(),
            status: TickerStatus::Ok,
            counts,
            bar_count: store.len(),
            dataset,
            features,
            report: Some(report),
        }
    }

    /// Run every ticker in parallel. Results come back in input order.
    pub fn run(&self, inputs: &[TickerInput], classifier: &dyn Classifier) -> Vec<TickerResult> {
        let results: Vec<TickerResult> = inputs
            .par_iter()
            .map(|input| self.run_ticker(input, classifier))
            .collect();

        let failed = results.iter().filter(|r| !r.status.is_ok()).count();
        info!(tickers = results.len(), failed, "pipeline finished");
        results
    }

    /// Load each ticker directory under `data_dir` and run it.
    ///
    /// A directory that cannot be loaded becomes a failed ticker; the rest
    /// still run. Results come back in `tickers` order.
    pub fn run_dirs(
        &self,
        data_dir: &Path,
        tickers: &[String],
        classifier: &dyn Classifier,
    ) -> Vec<TickerResult> {
        let results: Vec<TickerResult> = tickers
            .par_iter()
            .map(|ticker| match load_ticker_dir(data_dir, ticker) {
                Ok(input) => self.run_ticker(&input, classifier),
                Err(e) => TickerResult::failed(
                    ticker,
                    SoftFailureCounts::default(),
                    0,
                    format!("failed to load inputs: {e}"),
                ),
            })
            .collect();

        let failed = results.iter().filter(|r| !r.status.is_ok()).count();
        info!(tickers = results.len(), failed, "pipeline finished");
        results
    }
}
