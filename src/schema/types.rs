// src/schema/types.rs

/// A label plus its 1-based occurrence index within one location's rows.
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct ColumnKey {
    pub label: String,
    pub occurrence: u32,
}

impl ColumnKey {
    pub fn new(label: impl Into<String>, occurrence: u32) -> Self {
        Self {
            label: label.into(),
            occurrence,
        }
    }
}

/// Fixed leading columns of every exported table.
pub const COUNTRY_COLUMN: &str = "Country";
pub const CITY_COLUMN: &str = "City";

/// `City` value used for a country-level average row.
pub const AVERAGE_CITY: &str = "average";

pub fn low_range_column(identity: &str) -> String {
    format!("{} Low Range", identity)
}

pub fn high_range_column(identity: &str) -> String {
    format!("{} High Range", identity)
}
