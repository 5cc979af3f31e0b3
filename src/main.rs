use anyhow::{Context, Result};
use clap::Parser;
use colscraper::{config::ScraperConfig, fetch::HttpSource, scrape::Scraper, store::MissingLocation};
use std::{path::PathBuf, time::Duration};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use colscraper::config::{DEFAULT_BASE_URL, DEFAULT_CURRENCY, DEFAULT_OUTPUT};

#[derive(Parser, Debug)]
#[command(
    name = "colscraper",
    version,
    about = "Download cost-of-living data for specified countries and cities into Parquet"
)]
struct Cli {
    /// Countries each followed by their cities; hyphens for multi-word names.
    /// Example: United-States New-York Canada Toronto
    #[arg(long, num_args = 1..)]
    selective: Vec<String>,

    /// Download every country's average in addition to the selection.
    #[arg(long)]
    all_countries: bool,

    /// Parquet file to write (overwritten).
    #[arg(long, env = "COL_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Root of the cost-of-living pages.
    #[arg(long, env = "COL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: Url,

    /// Currency the source should display prices in.
    #[arg(long, env = "COL_CURRENCY", default_value = DEFAULT_CURRENCY)]
    currency: String,

    /// Pause after every request, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pacing_ms: u64,

    /// Attempts per request before giving up on it.
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Fixed wait between attempts, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl From<Cli> for ScraperConfig {
    fn from(cli: Cli) -> Self {
        Self {
            base_url: cli.base_url,
            display_currency: cli.currency,
            output: cli.output,
            pacing: Duration::from_millis(cli.pacing_ms),
            max_retries: cli.max_retries,
            retry_delay: Duration::from_millis(cli.retry_delay_ms),
            request_timeout: Duration::from_secs(cli.timeout_secs),
        }
    }
}

fn report_missing(missing: &[MissingLocation]) {
    if missing.is_empty() {
        return;
    }
    let list = missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    warn!(count = missing.len(), "Locations with missing data: {}", list);
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let cli = Cli::parse();
    let selective = cli.selective.clone();
    let all_countries = cli.all_countries;
    let cfg = ScraperConfig::from(cli);
    info!(output = %cfg.output.display(), base = %cfg.base_url, "configured");

    // ─── 3) fetch & merge ────────────────────────────────────────────
    let source = HttpSource::new(&cfg)?;
    let mut scraper = Scraper::new(source, cfg);
    scraper
        .run(selective.as_slice(), all_countries)
        .await
        .context("fetch loop")?;
    info!("Data collection completed");

    // ─── 4) export ───────────────────────────────────────────────────
    match scraper.export() {
        Ok(summary) => {
            info!(
                path = %summary.path.display(),
                rows = summary.rows,
                columns = summary.columns,
                "Data saved successfully"
            );
            report_missing(&summary.missing);
        }
        Err(e) => {
            error!("export failed: {:#}", e);
            report_missing(scraper.store().missing());
            return Err(e.context("exporting data"));
        }
    }

    info!("all done");
    Ok(())
}
