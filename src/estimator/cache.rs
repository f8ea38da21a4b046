//! Estimate memoization
//!
//! Keyed by the structural identity of a query's filter plus the kind of
//! estimate, so the scorer never runs the same sample pass twice within a
//! run. Scoped to one engine run; never persisted.

use std::collections::HashMap;

use crate::query::Query;

/// Which estimate a cache entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateKind {
    /// Documents matching a filter
    Documents,
    /// Index keys touched by a key-count query
    IndexKeys,
}

impl EstimateKind {
    fn prefix(&self) -> &'static str {
        match self {
            EstimateKind::Documents => "count",
            EstimateKind::IndexKeys => "keys",
        }
    }
}

/// Memoized estimates for one engine run
#[derive(Debug, Default)]
pub struct EstimateCache {
    entries: HashMap<String, f64>,
}

impl EstimateCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a memoized estimate, if present
    pub fn get(&self, kind: EstimateKind, query: &Query) -> Option<f64> {
        self.entries.get(&Self::key(kind, query)).copied()
    }

    /// Memoizes an estimate
    pub fn insert(&mut self, kind: EstimateKind, query: &Query, estimate: f64) {
        self.entries.insert(Self::key(kind, query), estimate);
    }

    /// Number of memoized estimates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is memoized yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(kind: EstimateKind, query: &Query) -> String {
        format!("{}:{}", kind.prefix(), query.filter().cache_key())
    }
}
