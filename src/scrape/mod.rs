// src/scrape/mod.rs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::ScraperConfig;
use crate::export;
use crate::fetch::{urls, LocationSource, PageTable};
use crate::process::rows::{parse_rows, RawRow};
use crate::schema::{ColumnResolver, ColumnSequence};
use crate::store::{Cell, Location, LocationRecord, MissingLocation, RecordStore};

pub mod selection;

pub use selection::{parse_selection, CountrySelection};

/// What the export step produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub missing: Vec<MissingLocation>,
}

/// One scrape run: fetches locations in order, merges each table into the
/// shared column layout, and exports the result.
///
/// All merge state lives here and is only touched through `&mut self`, so
/// locations are folded in strictly one at a time.
pub struct Scraper<S> {
    source: S,
    cfg: ScraperConfig,
    resolver: ColumnResolver,
    sequence: ColumnSequence,
    store: RecordStore,
}

impl<S: LocationSource> Scraper<S> {
    pub fn new(source: S, cfg: ScraperConfig) -> Self {
        Self {
            source,
            cfg,
            resolver: ColumnResolver::new(),
            sequence: ColumnSequence::new(),
            store: RecordStore::new(),
        }
    }

    /// Fetch every selected country (or every available one) and the
    /// requested cities under each. Per-location failures end up in the
    /// missing log; only a failed country list lookup is an error.
    pub async fn run<T: AsRef<str>>(&mut self, tokens: &[T], all_countries: bool) -> Result<()> {
        if tokens.is_empty() && !all_countries {
            warn!("nothing selected; pass countries or request all of them");
            return Ok(());
        }

        let available = self
            .source
            .country_names()
            .await
            .context("loading the country list")?;
        info!(countries = available.len(), "source lists countries");

        let plan = parse_selection(tokens, &available);
        let countries: Vec<String> = if all_countries {
            info!(
                total = available.len(),
                "Downloading data for all countries"
            );
            available
        } else {
            let names: Vec<String> = plan.iter().map(|s| s.country.clone()).collect();
            info!(?names, "Downloading data only for specified countries");
            names
        };

        for country in &countries {
            self.fetch_country(country).await;

            let cities = plan
                .iter()
                .find(|s| &s.country == country)
                .map(|s| s.cities.as_slice())
                .unwrap_or_default();
            if cities.is_empty() {
                info!(%country, "no specific cities, only average data was downloaded");
                continue;
            }
            for city in cities {
                self.fetch_city(country, city).await;
            }
        }

        info!(
            records = self.store.records().len(),
            columns = self.sequence.len(),
            missing = self.store.missing().len(),
            "fetch loop finished"
        );
        Ok(())
    }

    /// Country-average page. There is no fallback URL form for countries.
    pub async fn fetch_country(&mut self, country: &str) -> bool {
        let location = Location::CountryAverage {
            country: country.to_string(),
        };
        let url = match urls::country_url(&self.cfg.base_url, country, &self.cfg.display_currency) {
            Ok(u) => u,
            Err(e) => {
                warn!(%country, error = %e, "cannot build country URL");
                self.store.record_missing(MissingLocation::from(&location));
                return false;
            }
        };

        if self.try_location(&location, &url).await {
            info!(%country, "Successfully collected data (average)");
            true
        } else {
            warn!(%country, "No cost of living data found for country average");
            self.store.record_missing(MissingLocation::from(&location));
            false
        }
    }

    /// City page: `<City>-<Country>` first, then `<City>` alone.
    pub async fn fetch_city(&mut self, country: &str, city: &str) -> bool {
        let location = Location::City {
            country: country.to_string(),
            city: city.to_string(),
        };
        let base = &self.cfg.base_url;
        let currency = &self.cfg.display_currency;
        let candidates: Vec<Url> = [
            urls::city_url(base, city, country, currency),
            urls::city_only_url(base, city, currency),
        ]
        .into_iter()
        .filter_map(|r| r.map_err(|e| warn!(%city, error = %e, "cannot build city URL")).ok())
        .collect();

        for url in &candidates {
            if self.try_location(&location, url).await {
                info!(%city, %country, "Successfully completed city");
                return true;
            }
            debug!(%url, "no table, trying next URL form");
        }

        warn!(location = %location, "No cost of living data found");
        self.store.record_missing(MissingLocation::from(&location));
        false
    }

    /// One fetch attempt for one URL form. Transport errors (after the
    /// source's own retries) and table-less pages both count as a miss.
    async fn try_location(&mut self, location: &Location, url: &Url) -> bool {
        match self.source.fetch_table(url).await {
            Ok(PageTable::Found(rows)) => {
                self.merge_location(location, &rows);
                true
            }
            Ok(PageTable::Missing) => {
                debug!(%url, "page has no price table");
                false
            }
            Err(e) => {
                warn!(%url, error = %e, "fetch failed");
                false
            }
        }
    }

    /// Fold one location's rows into the resolver, the sequence and the store.
    #[instrument(
        level = "debug",
        skip(self, location, rows),
        fields(location = %location, rows = rows.len())
    )]
    pub fn merge_location(&mut self, location: &Location, rows: &[RawRow]) {
        let mut record = LocationRecord::new(location);
        let mut order = Vec::with_capacity(rows.len());

        for row in parse_rows(rows) {
            let id = self.resolver.resolve(&row.label, row.occurrence);
            record.cells.insert(
                id.clone(),
                Cell {
                    value: row.value,
                    range: row.range,
                },
            );
            order.push(id);
        }

        self.sequence.merge(order.as_slice());
        self.store.append(record);
        debug!(columns = self.sequence.len(), "merged location");
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn columns(&self) -> &ColumnSequence {
        &self.sequence
    }

    /// Export to the configured output path.
    pub fn export(&self) -> Result<ExportSummary> {
        self.export_to(&self.cfg.output)
    }

    pub fn export_to(&self, path: &Path) -> Result<ExportSummary> {
        let batch = export::build_batch(self.store.records(), self.sequence.as_slice(), |id| {
            self.store.has_range(id)
        })?;
        export::write_parquet(&batch, path)
            .with_context(|| format!("exporting to {}", path.display()))?;

        Ok(ExportSummary {
            path: path.to_path_buf(),
            rows: batch.num_rows(),
            columns: batch.num_columns(),
            missing: self.store.missing().to_vec(),
        })
    }
}
