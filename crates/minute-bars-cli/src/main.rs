use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use minute_bars_core::export;
use minute_bars_core::repair::repair_header_artifact;
use minute_bars_core::request::{Interval, TimeSeriesRequest};
use minute_bars_core::trading_calendar;
use minute_bars_providers::provider::BarProvider;
use minute_bars_providers::yahoo::YahooProvider;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "minute-bars",
    about = "Export one week of minute bars (timestamp, price, volume) to CSV"
)]
struct Cli {
    /// Ticker symbol to fetch
    #[arg(short, long, default_value = "AAPL")]
    symbol: String,

    /// Bar interval (only 1m is supported)
    #[arg(long, default_value = "1m")]
    interval: Interval,

    /// First day of the window (YYYY-MM-DD, inclusive)
    #[arg(long, default_value = "2025-11-24")]
    start: NaiveDate,

    /// Last day of the window (YYYY-MM-DD, inclusive)
    #[arg(long, default_value = "2025-11-30")]
    end: NaiveDate,

    /// Output CSV path (default: <SYMBOL>_sample.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn request(&self) -> Result<TimeSeriesRequest> {
        TimeSeriesRequest::new(&self.symbol, self.interval, self.start, self.end)
            .context("invalid export parameters")
    }
}

fn default_output(symbol: &str) -> PathBuf {
    PathBuf::from(format!("{symbol}_sample.csv"))
}

/// What a completed export produced.
#[derive(Debug)]
struct ExportSummary {
    rows: usize,
    artifact_removed: bool,
}

/// Fetch, project and write the bars for `request`, then strip any header
/// artifact from the written file.
async fn run_export(
    provider: &dyn BarProvider,
    request: &TimeSeriesRequest,
    output: &Path,
) -> Result<ExportSummary> {
    let symbol = request.symbol();
    let (start, end) = (request.start(), request.end());

    let weekdays = trading_calendar::weekday_count(start, end);
    if weekdays == 0 {
        warn!("{symbol}: {start} to {end} contains no weekdays, expecting no bars");
    } else {
        info!("{symbol}: {start} to {end} spans {weekdays} weekday(s)");
    }

    info!("Using provider: {}", provider.name());
    let bars = provider
        .fetch_bars(request)
        .await
        .with_context(|| format!("failed to fetch {symbol} bars from {}", provider.name()))?;

    if bars.is_empty() {
        warn!("{symbol}: provider returned no bars for {start} to {end}, writing header only");
    } else {
        info!("{symbol}: fetched {} bar(s)", bars.len());
    }

    let rows = export::project(&bars);
    export::write_csv(output, &rows)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Saved raw data to {} for {symbol}, {} bars, {start} to {end}.",
        output.display(),
        request.interval(),
    );

    let artifact_removed = repair_header_artifact(output, symbol)
        .with_context(|| format!("failed to repair header of {}", output.display()))?;
    if artifact_removed {
        info!("{}: removed duplicate header line", output.display());
    }

    Ok(ExportSummary {
        rows: rows.len(),
        artifact_removed,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    let request = cli.request()?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(request.symbol()));

    let provider = YahooProvider::new().context("failed to create Yahoo provider")?;
    let summary = run_export(&provider, &request, &output).await?;
    info!(
        "{}: {} row(s) written{}",
        output.display(),
        summary.rows,
        if summary.artifact_removed {
            ", header repaired"
        } else {
            ""
        }
    );

    Ok(())
}
