use once_cell::sync::Lazy;
use regex::Regex;

/// Thousands separators, non-breaking spaces and any currency symbol.
static PRICE_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\x{a0}\p{Sc}]").expect("price markup regex should compile"));

/// 1) Strip locale markup from a price cell and trim what is left.
pub fn clean_str(raw: &str) -> String {
    PRICE_MARKUP.replace_all(raw, "").trim().to_string()
}

/// 2) Parse a cleaned cell into a finite f64; anything else is missing.
pub fn parse_price(cleaned: &str) -> Option<f64> {
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Collapse runs of whitespace (including `\u{a0}`) into single spaces.
pub fn squash_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_and_separators() {
        assert_eq!(clean_str("1,200.00\u{a0}$"), "1200.00");
        assert_eq!(clean_str(" 15.50 € "), "15.50");
        assert_eq!(clean_str("£3,000"), "3000");
    }

    #[test]
    fn leaves_narrative_text_alone() {
        assert_eq!(clean_str("Data not available"), "Data not available");
        assert_eq!(parse_price(&clean_str("Data not available")), None);
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("0"), Some(0.0));
    }

    #[test]
    fn squashes_whitespace() {
        assert_eq!(squash_whitespace("  a \n\t b\u{a0}c "), "a b c");
    }
}
