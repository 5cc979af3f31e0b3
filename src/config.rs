// src/config.rs

use std::{path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.numbeo.com/cost-of-living/";
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_OUTPUT: &str = "data/cost_of_living_data.parquet";

/// Runtime settings for one scrape.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Root of the cost-of-living section; every page URL is joined onto it.
    pub base_url: Url,
    pub display_currency: String,
    pub output: PathBuf,
    /// Sleep after every network call.
    pub pacing: Duration,
    /// Total attempts per request before it counts as a failed fetch.
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL should parse"),
            display_currency: DEFAULT_CURRENCY.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            pacing: Duration::from_secs(1),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}
