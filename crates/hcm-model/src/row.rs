use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One tabular record: column name to optional string value.
///
/// A missing column and an explicit null are both read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: BTreeMap<String, Option<String>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.cells.insert(column.into(), value);
    }

    /// Raw value of a column, `None` when absent or null.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|v| v.as_deref())
    }

    /// Trimmed value, `None` when absent, null or whitespace only.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn is_blank(&self, column: &str) -> bool {
        self.value(column).is_none()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_covers_missing_null_and_whitespace() {
        let row: Row = [("A", Some("x")), ("B", None), ("C", Some("  "))]
            .into_iter()
            .collect();
        assert!(!row.is_blank("A"));
        assert!(row.is_blank("B"));
        assert!(row.is_blank("C"));
        assert!(row.is_blank("D"));
        assert_eq!(row.get("C"), Some("  "));
    }
}
