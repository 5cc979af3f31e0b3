// src/fetch/page.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, trace};
use url::Url;

use super::urls::clean_location_name;
use crate::process::rows::RawRow;
use crate::process::utils::squash_whitespace;

static PRICE_TABLE: Lazy<Selector> = Lazy::new(|| selector("table.data_wide_table"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
static CELL: Lazy<Selector> = Lazy::new(|| selector("td"));
static BAR_LEFT: Lazy<Selector> = Lazy::new(|| selector("span.barTextLeft"));
static BAR_RIGHT: Lazy<Selector> = Lazy::new(|| selector("span.barTextRight"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("CSS selector should be valid")
}

/// What a location page yielded.
#[derive(Debug, Clone, PartialEq)]
pub enum PageTable {
    Found(Vec<RawRow>),
    /// The page loaded but carries no price table.
    Missing,
}

/// Pull `(label, value, range)` rows out of the first price table on a page.
/// Rows without at least a label and a value cell (section headers) are skipped.
pub fn extract_price_table(html: &str) -> PageTable {
    let doc = Html::parse_document(html);
    let Some(table) = doc.select(&PRICE_TABLE).next() else {
        debug!("no price table on page");
        return PageTable::Missing;
    };

    let mut rows = Vec::new();
    for tr in table.select(&ROW) {
        let cells: Vec<ElementRef> = tr.select(&CELL).collect();
        if cells.len() < 2 {
            trace!("skipping row with {} cells", cells.len());
            continue;
        }
        let label = element_text(&cells[0]);
        let value = element_text(&cells[1]);
        let range = cells.get(2).map(range_text).unwrap_or_default();
        rows.push(RawRow::new(label, value, range));
    }

    debug!(rows = rows.len(), "extracted price table");
    PageTable::Found(rows)
}

/// Range cells are drawn as a bar with the bounds in two spans; join those
/// with a hyphen, otherwise use the cell text as is.
fn range_text(cell: &ElementRef) -> String {
    let left = cell.select(&BAR_LEFT).next().map(|e| element_text(&e));
    let right = cell.select(&BAR_RIGHT).next().map(|e| element_text(&e));
    match (left, right) {
        (Some(l), Some(r)) => format!("{} - {}", l, r),
        _ => element_text(cell),
    }
}

fn element_text(el: &ElementRef) -> String {
    squash_whitespace(&el.text().collect::<String>())
}

/// Country names linked from the index page, decoded, in page order.
pub fn extract_country_names(html: &str, base: &Url) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for el in doc.select(&LINK) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if !href.contains("country_result") {
            continue;
        }
        let name = match base.join(href) {
            Ok(u) => u
                .query_pairs()
                .find(|(k, _)| k == "country")
                .map(|(_, v)| v.trim().to_string()),
            // unjoinable href: take the raw query value
            Err(_) => href
                .split_once('=')
                .map(|(_, v)| clean_location_name(v.split('&').next().unwrap_or(v))),
        };
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            if seen.insert(name.clone()) {
                out.push(name);
            }
        }
    }

    debug!(countries = out.len(), "extracted country list");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITY_PAGE: &str = r#"
<html><body>
<table class="data_wide_table new_bar_table">
  <tr><th>Restaurants</th><th>Edit</th><th>Range</th></tr>
  <tr>
    <td>Meal, Inexpensive Restaurant</td>
    <td style="text-align: right" class="priceValue">20.00&nbsp;$</td>
    <td class="priceBarTd">
      <span class="barTextLeft">15.00</span>
      <span class="barFill">&nbsp;</span>
      <span class="barTextRight">30.00</span>
    </td>
  </tr>
  <tr>
    <td>Apartment (1 bedroom) in City Centre</td>
    <td class="priceValue">1,850.37&nbsp;$</td>
    <td>1,500.00 - 2,400.00</td>
  </tr>
  <tr><td>Note</td><td>Data not available</td></tr>
</table>
</body></html>"#;

    #[test]
    fn extracts_rows_and_ranges() {
        let PageTable::Found(rows) = extract_price_table(CITY_PAGE) else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "Meal, Inexpensive Restaurant");
        assert_eq!(rows[0].value, "20.00 $");
        assert_eq!(rows[0].range, "15.00 - 30.00");
        assert_eq!(rows[1].range, "1,500.00 - 2,400.00");
        assert_eq!(rows[2].value, "Data not available");
        assert_eq!(rows[2].range, "");
    }

    #[test]
    fn page_without_table_is_missing() {
        let html = "<html><body><p>Cannot find city</p></body></html>";
        assert_eq!(extract_price_table(html), PageTable::Missing);
    }

    #[test]
    fn country_links_in_order() {
        let html = r#"
<a href="country_result.jsp?country=Canada">Canada</a>
<a href="/cost-of-living/rankings.jsp">Rankings</a>
<a href="country_result.jsp?country=United+States">United States</a>
<a href="country_result.jsp?country=Congo+%28Kinshasa%29">Congo</a>
<a href="country_result.jsp?country=Canada">Canada again</a>"#;
        let base = Url::parse("https://www.numbeo.com/cost-of-living/").unwrap();
        assert_eq!(
            extract_country_names(html, &base),
            ["Canada", "United States", "Congo (Kinshasa)"]
        );
    }
}
