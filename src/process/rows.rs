// src/process/rows.rs

use std::collections::HashMap;
use tracing::{debug, trace};

use super::utils::{clean_str, parse_price};

/// One row as extracted from a location's price table, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub label: String,
    pub value: String,
    /// Empty when the page shows no range for this row.
    pub range: String,
}

impl RawRow {
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            range: range.into(),
        }
    }
}

/// Low/high sub-values of a price. Either side is `None` when it did not parse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// A cleaned row, tagged with how many times its label has been seen so far
/// within the same location (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub label: String,
    pub occurrence: u32,
    /// Markup-stripped value text. Numeric coercion happens at export.
    pub value: String,
    /// `None` when the page carried no range text at all.
    pub range: Option<PriceRange>,
}

/// Split `"800.50 $ - 1,200.00 $"` into its two numeric sides.
/// Anything other than exactly two parseable parts yields `(None, None)`.
pub fn parse_range(raw: &str) -> PriceRange {
    let parts: Vec<&str> = raw.split('-').collect();
    if parts.len() != 2 {
        trace!(range = raw, "range does not split into two parts");
        return PriceRange::default();
    }
    match (
        parse_price(&clean_str(parts[0])),
        parse_price(&clean_str(parts[1])),
    ) {
        (Some(low), Some(high)) => PriceRange {
            low: Some(low),
            high: Some(high),
        },
        _ => {
            trace!(range = raw, "unparseable range side");
            PriceRange::default()
        }
    }
}

/// Clean every row of one location and assign occurrence indices.
pub fn parse_rows(rows: &[RawRow]) -> Vec<ParsedRow> {
    let mut seen: HashMap<&str, u32> = HashMap::new();
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let label = row.label.trim();
        if label.is_empty() {
            debug!(value = %row.value, "skipping row without label");
            continue;
        }

        let count = seen.entry(label).or_insert(0);
        *count += 1;

        let range_text = row.range.trim();
        let range = if range_text.is_empty() {
            None
        } else {
            Some(parse_range(range_text))
        };

        out.push(ParsedRow {
            label: label.to_string(),
            occurrence: *count,
            value: clean_str(&row.value),
            range,
        });
    }

    out
}
