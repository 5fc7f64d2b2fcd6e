//! Alias table with lookups in both directions

use crate::normalizer::model::fold;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Maps lower-cased aliases to lower-cased canonical names.
///
/// Keys and values are folded on insertion, so callers may hand in any
/// casing. Pairs with a blank side are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: &str, canonical: &str) {
        let alias = fold(alias);
        let canonical = fold(canonical);
        if alias.is_empty() || canonical.is_empty() {
            return;
        }
        self.entries.insert(alias, canonical);
    }

    /// Merge another table in; its entries win on conflict.
    pub fn extend(&mut self, other: &AliasTable) {
        for (alias, canonical) in &other.entries {
            self.entries.insert(alias.clone(), canonical.clone());
        }
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(&fold(alias)).map(String::as_str)
    }

    /// Candidate canonical strings for a folded label, in lookup order:
    /// the forward target first, then every alias whose target is the label.
    pub fn resolve(&self, folded_label: &str) -> Vec<&str> {
        let mut candidates = Vec::new();
        if let Some(target) = self.entries.get(folded_label) {
            candidates.push(target.as_str());
        }
        candidates.extend(
            self.entries
                .iter()
                .filter(|(_, canonical)| canonical.as_str() == folded_label)
                .map(|(alias, _)| alias.as_str()),
        );
        candidates
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}

impl<A: AsRef<str>, C: AsRef<str>> FromIterator<(A, C)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, C)>>(iter: I) -> Self {
        let mut table = AliasTable::new();
        for (alias, canonical) in iter {
            table.insert(alias.as_ref(), canonical.as_ref());
        }
        table
    }
}

impl<'de> Deserialize<'de> for AliasTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}
