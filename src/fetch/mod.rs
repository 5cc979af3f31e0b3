// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ScraperConfig;

pub mod page;
pub mod urls;

pub use page::PageTable;

/// Where location pages come from. The run driver only talks to this trait,
/// so the merge logic can be exercised against canned pages.
#[allow(async_fn_in_trait)]
pub trait LocationSource {
    /// Country names in source order.
    async fn country_names(&self) -> Result<Vec<String>>;

    /// Fetch one location page and extract its price table.
    /// `Err` means the page could not be fetched at all.
    async fn fetch_table(&self, url: &Url) -> Result<PageTable>;
}

/// Live source: one reqwest client, fixed-backoff retries and a pacing
/// sleep after every request.
pub struct HttpSource {
    client: Client,
    base_url: Url,
    pacing: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpSource {
    pub fn new(cfg: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .gzip(true)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
            pacing: cfg.pacing,
            max_retries: cfg.max_retries.max(1),
            retry_delay: cfg.retry_delay,
        })
    }

    async fn get_text_core(&self, url: &Url) -> Result<String> {
        debug!("Fetching text from {}", url);
        let result: Result<String> = async {
            self.client
                .get(url.clone())
                .send()
                .await
                .with_context(|| format!("GET {} failed", url))?
                .error_for_status()
                .with_context(|| format!("Non-success status {}", url))?
                .text()
                .await
                .with_context(|| format!("Reading text from {}", url))
        }
        .await;

        // pace every call, whatever the outcome
        sleep(self.pacing).await;
        result
    }

    async fn get_text_with_retry(&self, url: &Url) -> Result<String> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.get_text_core(url).await {
                Ok(t) => return Ok(t),
                Err(e) if attempts < self.max_retries => {
                    warn!(
                        %url,
                        attempt = attempts,
                        delay_ms = self.retry_delay.as_millis() as u64,
                        error = %e,
                        "Retrying"
                    );
                    sleep(self.retry_delay).await;
                }
                Err(e) => {
                    error!(%url, attempts, error = %e, "Exhausted retries");
                    return Err(e);
                }
            }
        }
    }
}

impl LocationSource for HttpSource {
    async fn country_names(&self) -> Result<Vec<String>> {
        let index = urls::country_index_url(&self.base_url);
        let html = self
            .get_text_with_retry(&index)
            .await
            .with_context(|| format!("fetching country list from {}", index))?;
        Ok(page::extract_country_names(&html, &index))
    }

    async fn fetch_table(&self, url: &Url) -> Result<PageTable> {
        let html = self.get_text_with_retry(url).await?;
        Ok(page::extract_price_table(&html))
    }
}
