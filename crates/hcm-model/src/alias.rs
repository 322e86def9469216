//! Curated source-name synonyms per target field.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Static mapping from a target field to the source names known to mean it.
///
/// Built once at startup and shared read-only; aliases are stored as
/// written and normalized by the mapper when compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDictionary {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl AliasDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one alias for a target field. Blank aliases are ignored.
    pub fn insert(&mut self, target: impl Into<String>, alias: impl Into<String>) {
        let alias = alias.into();
        if alias.trim().is_empty() {
            return;
        }
        self.entries.entry(target.into()).or_default().insert(alias);
    }

    /// Builder form of [`Self::insert`] for several aliases at once.
    #[must_use]
    pub fn with_aliases<I, S>(mut self, target: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            self.insert(target, alias);
        }
        self
    }

    /// Aliases declared for a target, in lexical order.
    pub fn aliases_for(&self, target: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(target)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total number of aliases across all targets.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold another dictionary into this one.
    pub fn merge(&mut self, other: AliasDictionary) {
        for (target, aliases) in other.entries {
            self.entries.entry(target).or_default().extend(aliases);
        }
    }
}
