// src/schema/identity.rs

use std::collections::{HashMap, HashSet};
use tracing::{trace, warn};

use super::types::{high_range_column, low_range_column, ColumnKey, CITY_COLUMN, COUNTRY_COLUMN};

const SUFFIX_SEP: char = '_';

/// Memoized `(label, occurrence) → column name` mapping for one run.
///
/// The first time a key is seen it gets `label` (occurrence 1) or
/// `label_<n>`; every later lookup of the same key returns that name, no
/// matter which location asks or in what order.
///
/// Names are unique across everything the exporter writes: `Country` and
/// `City` are reserved up front, and each identity also claims its
/// `Low Range`/`High Range` names.
#[derive(Debug)]
pub struct ColumnResolver {
    assigned: HashMap<ColumnKey, String>,
    taken: HashSet<String>,
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnResolver {
    pub fn new() -> Self {
        Self {
            assigned: HashMap::new(),
            taken: [COUNTRY_COLUMN, CITY_COLUMN]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn resolve(&mut self, label: &str, occurrence: u32) -> String {
        let key = ColumnKey::new(label, occurrence);
        if let Some(id) = self.assigned.get(&key) {
            return id.clone();
        }

        let natural = natural_identity(label, occurrence);
        let mut id = natural.clone();
        let mut bump = 2;
        while !self.is_free(&id) {
            id = format!("{}{}{}", natural, SUFFIX_SEP, bump);
            bump += 1;
        }
        if id != natural {
            warn!(label, occurrence, column = %id, "column name already taken, suffixed");
        }

        trace!(label, occurrence, column = %id, "assigned column");
        self.taken.insert(low_range_column(&id));
        self.taken.insert(high_range_column(&id));
        self.taken.insert(id.clone());
        self.assigned.insert(key, id.clone());
        id
    }

    fn is_free(&self, id: &str) -> bool {
        !self.taken.contains(id)
            && !self.taken.contains(&low_range_column(id))
            && !self.taken.contains(&high_range_column(id))
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

fn natural_identity(label: &str, occurrence: u32) -> String {
    if occurrence <= 1 {
        label.to_string()
    } else {
        format!("{}{}{}", label, SUFFIX_SEP, occurrence)
    }
}
