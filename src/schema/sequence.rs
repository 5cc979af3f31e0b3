// src/schema/sequence.rs

use tracing::trace;

/// The single canonical column order of the run.
///
/// Only insertion is allowed: once two names are in the sequence their
/// relative order never changes, and no name appears twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnSequence {
    columns: Vec<String>,
}

impl ColumnSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one location's column order into the master order.
    ///
    /// Walks both lists with a cursor each. A match advances both; a name
    /// that already sits elsewhere moves the master cursor just past it; a
    /// new name is inserted at the master cursor.
    pub fn merge<S: AsRef<str>>(&mut self, new_order: &[S]) {
        let mut cursor = 0;
        for name in new_order {
            let name = name.as_ref();
            if self.columns.get(cursor).map(String::as_str) == Some(name) {
                cursor += 1;
                continue;
            }
            match self.position(name) {
                Some(existing) => {
                    cursor = existing + 1;
                }
                None => {
                    trace!(column = name, at = cursor, "inserting column");
                    self.columns.insert(cursor, name.to_string());
                    cursor += 1;
                }
            }
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
