// src/scrape/selection.rs

use std::collections::HashMap;
use tracing::warn;

use crate::fetch::urls::match_key;

/// A country to fetch plus the cities requested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySelection {
    /// Name as the source spells it.
    pub country: String,
    /// Display names, hyphens replaced by spaces.
    pub cities: Vec<String>,
}

/// Turn `United-States New-York Canada Toronto` into an ordered plan.
///
/// A token is a country when it matches one of `available`; the tokens after
/// it are its cities until the next country.
pub fn parse_selection<S: AsRef<str>>(tokens: &[S], available: &[String]) -> Vec<CountrySelection> {
    let by_key: HashMap<String, &String> = available.iter().map(|c| (match_key(c), c)).collect();

    let mut plan: Vec<CountrySelection> = Vec::new();
    let mut current: Option<usize> = None;

    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        if let Some(&country) = by_key.get(&match_key(token)) {
            let idx = match plan.iter().position(|s| &s.country == country) {
                Some(idx) => idx,
                None => {
                    plan.push(CountrySelection {
                        country: country.clone(),
                        cities: Vec::new(),
                    });
                    plan.len() - 1
                }
            };
            current = Some(idx);
            continue;
        }
        match current {
            Some(idx) => plan[idx].cities.push(display_name(token)),
            None => warn!(token, "ignoring city given before any country"),
        }
    }

    plan
}

/// `New-York` → `New York`.
pub fn display_name(token: &str) -> String {
    token
        .split('-')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available() -> Vec<String> {
        ["Canada", "United States", "Germany"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn countries_followed_by_cities() {
        let plan = parse_selection(
            &["United-States", "New-York", "Chicago", "Canada", "Toronto", "Germany"],
            &available(),
        );
        assert_eq!(
            plan,
            vec![
                CountrySelection {
                    country: "United States".into(),
                    cities: vec!["New York".into(), "Chicago".into()],
                },
                CountrySelection {
                    country: "Canada".into(),
                    cities: vec!["Toronto".into()],
                },
                CountrySelection {
                    country: "Germany".into(),
                    cities: vec![],
                },
            ]
        );
    }

    #[test]
    fn leading_cities_are_dropped() {
        let plan = parse_selection(&["Paris", "canada", "Montreal"], &available());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].country, "Canada");
        assert_eq!(plan[0].cities, ["Montreal"]);
    }

    #[test]
    fn repeated_country_accumulates() {
        let plan = parse_selection(
            &["Canada", "Toronto", "Germany", "Berlin", "Canada", "Vancouver"],
            &available(),
        );
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].cities, ["Toronto", "Vancouver"]);
        assert_eq!(plan[1].cities, ["Berlin"]);
    }
}
