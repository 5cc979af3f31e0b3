// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use std::sync::Arc;

use super::types::{high_range_column, low_range_column, CITY_COLUMN, COUNTRY_COLUMN};

/// One output column derived from a resolved identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputColumn {
    Value(String),
    Low(String),
    High(String),
}

impl OutputColumn {
    pub fn identity(&self) -> &str {
        match self {
            OutputColumn::Value(id) | OutputColumn::Low(id) | OutputColumn::High(id) => id,
        }
    }

    pub fn name(&self) -> String {
        match self {
            OutputColumn::Value(id) => id.clone(),
            OutputColumn::Low(id) => low_range_column(id),
            OutputColumn::High(id) => high_range_column(id),
        }
    }
}

/// Expand the master order into output columns. `has_range` decides whether
/// an identity gets its `Low Range`/`High Range` pair.
pub fn layout_columns<F>(master: &[String], has_range: F) -> Vec<OutputColumn>
where
    F: Fn(&str) -> bool,
{
    let mut out = Vec::with_capacity(master.len() * 3);
    for id in master {
        if id == COUNTRY_COLUMN || id == CITY_COLUMN {
            continue;
        }
        out.push(OutputColumn::Value(id.clone()));
        if has_range(id) {
            out.push(OutputColumn::Low(id.clone()));
            out.push(OutputColumn::High(id.clone()));
        }
    }
    out
}

/// `Country` and `City` as non-null Utf8, every other column nullable Float64.
pub fn build_arrow_schema(cols: &[OutputColumn]) -> Arc<ArrowSchema> {
    let mut fields = Vec::with_capacity(cols.len() + 2);
    fields.push(ArrowField::new(COUNTRY_COLUMN, DataType::Utf8, false));
    fields.push(ArrowField::new(CITY_COLUMN, DataType::Utf8, false));
    fields.extend(
        cols.iter()
            .map(|c| ArrowField::new(c.name(), DataType::Float64, /* nullable = */ true)),
    );
    Arc::new(ArrowSchema::new(fields))
}
