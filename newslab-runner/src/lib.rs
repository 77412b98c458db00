//! NewsLab Runner: pipeline orchestration, configuration, loaders, export.
//!
//! This crate builds on `newslab-core` to provide:
//! - TOML pipeline configuration with validation
//! - Loaders for saved provider payloads, price files and classifier replays
//! - Per-ticker pipeline runs in parallel with soft-failure accounting
//! - CSV datasets and the JSON hypothesis report
//! - Date-range fetch planning for paging fetchers

pub mod config;
pub mod export;
pub mod fetch_plan;
pub mod loader;
pub mod pipeline;

pub use config::{ConfigError, PipelineConfig};
pub use export::{
    export_dataset_csv, export_features_csv, export_report_json, save_artifacts, RunReport,
    TickerReport,
};
pub use fetch_plan::{plan_fetch_windows, FetchWindow, PlanError};
pub use loader::{load_label_table, load_price_file, load_ticker_dir, LoadError};
pub use pipeline::{
    DateRange, NewsBatch, Pipeline, PreparedNews, SoftFailureCounts, TickerInput, TickerResult,
    TickerStatus,
};
