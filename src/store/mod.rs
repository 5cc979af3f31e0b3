// src/store/mod.rs

use std::{collections::HashMap, fmt};

use crate::process::rows::PriceRange;
use crate::schema::AVERAGE_CITY;

/// A place a price table can be fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    CountryAverage { country: String },
    City { country: String, city: String },
}

impl Location {
    pub fn country(&self) -> &str {
        match self {
            Location::CountryAverage { country } | Location::City { country, .. } => country,
        }
    }

    /// Value written to the `City` column.
    pub fn city(&self) -> &str {
        match self {
            Location::CountryAverage { .. } => AVERAGE_CITY,
            Location::City { city, .. } => city,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city(), self.country())
    }
}

/// One cell of a location record: the cleaned value text and, when the page
/// showed one, its range.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: String,
    pub range: Option<PriceRange>,
}

/// Sparse record for one successfully fetched location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub country: String,
    pub city: String,
    pub cells: HashMap<String, Cell>,
}

impl LocationRecord {
    pub fn new(location: &Location) -> Self {
        Self {
            country: location.country().to_string(),
            city: location.city().to_string(),
            cells: HashMap::new(),
        }
    }

    pub fn with_cell(mut self, column: impl Into<String>, cell: Cell) -> Self {
        self.cells.insert(column.into(), cell);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }
}

/// A location for which no data table was found under any URL form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingLocation {
    pub country: String,
    pub city: String,
}

impl From<&Location> for MissingLocation {
    fn from(location: &Location) -> Self {
        Self {
            country: location.country().to_string(),
            city: location.city().to_string(),
        }
    }
}

impl fmt::Display for MissingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

/// Append-only store of records plus the missing-location log.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<LocationRecord>,
    missing: Vec<MissingLocation>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: LocationRecord) {
        self.records.push(record);
    }

    pub fn record_missing(&mut self, missing: MissingLocation) {
        self.missing.push(missing);
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    pub fn missing(&self) -> &[MissingLocation] {
        &self.missing
    }

    /// True when any record carried range text for `column`.
    pub fn has_range(&self, column: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.get(column).is_some_and(|c| c.range.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rows_use_average_city() {
        let loc = Location::CountryAverage {
            country: "Canada".into(),
        };
        let rec = LocationRecord::new(&loc);
        assert_eq!(rec.city, "average");
        assert_eq!(MissingLocation::from(&loc).to_string(), "average, Canada");
    }

    #[test]
    fn tracks_ranged_columns() {
        let loc = Location::City {
            country: "Canada".into(),
            city: "Toronto".into(),
        };
        let mut store = RecordStore::new();
        store.append(
            LocationRecord::new(&loc)
                .with_cell(
                    "Rent",
                    Cell {
                        value: "1500".into(),
                        range: None,
                    },
                )
                .with_cell(
                    "Milk",
                    Cell {
                        value: "2".into(),
                        range: Some(PriceRange::default()),
                    },
                ),
        );
        assert!(!store.has_range("Rent"));
        assert!(store.has_range("Milk"));
        assert!(!store.has_range("Eggs"));
        assert_eq!(store.records().len(), 1);
        assert!(store.missing().is_empty());
    }
}
