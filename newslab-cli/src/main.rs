//! NewsLab CLI: run the news/price pipeline, evaluate a price file, plan fetches.
//!
//! Commands:
//! - `run`: load ticker directories, run the pipeline, write CSV/JSON artifacts
//! - `evaluate`: compute features and hypotheses for one price file, print JSON
//! - `plan`: split a date range into fetch windows
//!
//! Logging goes to stderr; set `RUST_LOG` to change the level (default `info`).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use newslab_core::classify::LabelTable;
use newslab_runner::{
    export_report_json, load_label_table, load_price_file, plan_fetch_windows,
    save_artifacts, DateRange, Pipeline, PipelineConfig, RunReport, TickerStatus,
};

#[derive(Parser)]
#[command(
    name = "newslab",
    about = "NewsLab CLI: join market news to daily prices and test simple hypotheses"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over saved news and price files.
    Run {
        /// Tickers to process (each is a directory under --data-dir).
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Directory holding `<TICKER>/prices.{csv,json}` and `<TICKER>/news/<provider>.json`.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON object mapping article URL to raw classifier output.
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Keep only news on or after this date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Keep only news on or before this date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Output directory. Overrides `[output] dir` from the config.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Compute features and hypotheses for one price file and print the report.
    Evaluate {
        /// Price file: CSV (`date,open,close`) or Alpha Vantage JSON.
        prices: PathBuf,

        /// Ticker label for the series.
        #[arg(long, default_value = "TICKER")]
        ticker: String,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Evaluate only the last N rows. Overrides `[evaluation] window`.
        #[arg(long)]
        window: Option<usize>,
    },
    /// Split a date range into consecutive fetch windows.
    Plan {
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: String,

        /// Maximum days per window.
        #[arg(long, default_value_t = 30)]
        interval_days: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            tickers,
            data_dir,
            config,
            labels,
            start,
            end,
            output_dir,
        } => run_pipeline_cmd(tickers, data_dir, config, labels, start, end, output_dir),
        Commands::Evaluate {
            prices,
            ticker,
            config,
            window,
        } => run_evaluate_cmd(&prices, &ticker, config, window),
        Commands::Plan {
            start,
            end,
            interval_days,
        } => run_plan_cmd(&start, &end, interval_days),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn date_range(start: Option<String>, end: Option<String>) -> Result<Option<DateRange>> {
    let start = start.as_deref().map(parse_date).transpose()?;
    let end = end.as_deref().map(parse_date).transpose()?;
    let range = match (start, end) {
        (None, None) => return Ok(None),
        (Some(start), Some(end)) => DateRange { start, end },
        (Some(start), None) => DateRange {
            start,
            end: NaiveDate::MAX,
        },
        (None, Some(end)) => DateRange {
            start: NaiveDate::MIN,
            end,
        },
    };
    if range.start > range.end {
        bail!("--start {} is after --end {}", range.start, range.end);
    }
    Ok(Some(range))
}

#[allow(clippy::too_many_arguments)]
fn run_pipeline_cmd(
    tickers: Vec<String>,
    data_dir: PathBuf,
    config: Option<PathBuf>,
    labels: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let output_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());

    let mut pipeline = Pipeline::new(config)?;
    if let Some(range) = date_range(start, end)? {
        pipeline = pipeline.with_date_range(range);
    }

    let classifier = match labels {
        Some(path) => load_label_table(&path)
            .with_context(|| format!("failed to load labels {}", path.display()))?,
        None => {
            warn!("no --labels given; every event gets the default labels");
            LabelTable::default()
        }
    };

    let results = pipeline.run_dirs(&data_dir, &tickers, &classifier);
    let written = save_artifacts(&results, &output_dir)?;

    for result in &results {
        match (&result.status, &result.report) {
            (TickerStatus::Ok, Some(report)) => println!(
                "{:<8} events={:<5} bars={:<5} breaches={} (above {}, below {})",
                result.ticker,
                result.dataset.len(),
                result.bar_count,
                report.bands.total_breaches,
                report.bands.breaches_above,
                report.bands.breaches_below,
            ),
            (TickerStatus::Failed { reason }, _) => {
                println!("{:<8} FAILED: {reason}", result.ticker)
            }
            (TickerStatus::Ok, None) => println!("{:<8} no report", result.ticker),
        }
    }
    info!(files = written.len(), dir = %output_dir.display(), "artifacts written");

    if results.iter().any(|r| !r.status.is_ok()) {
        std::process::exit(1);
    }
    Ok(())
}

fn run_evaluate_cmd(
    prices: &Path,
    ticker: &str,
    config: Option<PathBuf>,
    window: Option<usize>,
) -> Result<()> {
    let mut config = load_config(config.as_deref())?;
    if window.is_some() {
        config.evaluation.window = window;
    }
    let pipeline = Pipeline::new(config)?;

    let bars = load_price_file(prices, ticker)
        .with_context(|| format!("failed to load prices {}", prices.display()))?;
    let result = pipeline.evaluate_prices(ticker, bars);

    println!("{}", export_report_json(&RunReport::new(std::slice::from_ref(&result)))?);

    if let TickerStatus::Failed { reason } = &result.status {
        bail!("{ticker}: {reason}");
    }
    Ok(())
}

fn run_plan_cmd(start: &str, end: &str, interval_days: u32) -> Result<()> {
    let windows = plan_fetch_windows(parse_date(start)?, parse_date(end)?, interval_days)?;
    for w in &windows {
        println!("{} {} ({} days)", w.start, w.end, w.days());
    }
    Ok(())
}
