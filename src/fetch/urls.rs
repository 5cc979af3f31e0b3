// src/fetch/urls.rs
use anyhow::{Context, Result};
use url::Url;

/// Page listing every country, relative to the base URL.
pub fn country_index_url(base: &Url) -> Url {
    base.clone()
}

/// Country-average page: `country_result.jsp?country=<Country>&displayCurrency=<cur>`.
pub fn country_url(base: &Url, country: &str, currency: &str) -> Result<Url> {
    let mut url = base
        .join("country_result.jsp")
        .with_context(|| format!("joining country page onto {}", base))?;
    url.query_pairs_mut()
        .append_pair("country", country)
        .append_pair("displayCurrency", currency);
    Ok(url)
}

/// Primary city page: `in/<City>-<Country>?displayCurrency=<cur>`.
pub fn city_url(base: &Url, city: &str, country: &str, currency: &str) -> Result<Url> {
    let slug = format!("{}-{}", url_segment(city), url_segment(country));
    city_page(base, &slug, currency)
}

/// Fallback city page without the country: `in/<City>?displayCurrency=<cur>`.
pub fn city_only_url(base: &Url, city: &str, currency: &str) -> Result<Url> {
    city_page(base, &url_segment(city), currency)
}

fn city_page(base: &Url, slug: &str, currency: &str) -> Result<Url> {
    let mut url = base
        .join("in/")
        .with_context(|| format!("joining city path onto {}", base))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("base URL {} cannot have path segments", base))?
        .pop_if_empty()
        .push(slug);
    url.query_pairs_mut().append_pair("displayCurrency", currency);
    Ok(url)
}

/// Multi-word names become hyphen-joined path segments.
pub fn url_segment(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Decode the country names as they appear in index-page links
/// (`United+States`, `Bosnia+And+Herzegovina`, `%28`/`%29` escapes).
pub fn clean_location_name(raw: &str) -> String {
    url::form_urlencoded::parse(format!("n={}", raw).as_bytes())
        .next()
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Key used to match user tokens against source names: hyphens, plus signs
/// and whitespace are equivalent and ASCII case is ignored.
pub fn match_key(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '+' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
