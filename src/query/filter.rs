//! Ordered filter
//!
//! A conjunction of per-field predicates. Field order is the insertion order
//! of the original filter document and is preserved because it feeds both
//! candidate enumeration and estimate cache keys.

use super::predicate::Predicate;

/// Mapping from field name to predicate, in insertion order.
///
/// Field names are unique; the MQL parser guarantees this on construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    entries: Vec<(String, Predicate)>,
}

impl Filter {
    /// Creates an empty filter
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a predicate for a field not yet present
    pub fn push(&mut self, field: String, predicate: Predicate) {
        debug_assert!(
            !self.contains(&field),
            "duplicate filter field '{}'",
            field
        );
        self.entries.push((field, predicate));
    }

    /// Returns the predicate for a field, if any
    pub fn get(&self, field: &str) -> Option<&Predicate> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, predicate)| predicate)
    }

    /// True if the field has a predicate
    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    /// Field names in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// (field, predicate) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.entries
            .iter()
            .map(|(name, predicate)| (name.as_str(), predicate))
    }

    /// Number of filtered fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no field is filtered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any predicate is the widened Exists form
    pub fn has_exists(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, predicate)| matches!(predicate, Predicate::Exists))
    }

    /// Stable textual identity of this filter, for estimate memoization.
    pub(crate) fn cache_key(&self) -> String {
        let mut key = String::with_capacity(32 * self.entries.len());
        for (field, predicate) in &self.entries {
            key.push_str(field);
            key.push('=');
            predicate.cache_fragment(&mut key);
            key.push(';');
        }
        key
    }
}
