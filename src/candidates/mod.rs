//! Candidate index enumeration
//!
//! For every workload query, emits all permutations of the fields the query
//! reads, up to the configured compound-index width. Permutation order
//! matters: `(a, b)` and `(b, a)` are distinct candidates. Enumeration order
//! is first-seen and therefore deterministic, which fixes the selector's
//! tie-breaking.

use std::collections::HashSet;
use std::fmt;

use crate::query::Query;

/// An ordered tuple of distinct field names proposed as a compound index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexCandidate {
    fields: Vec<String>,
}

impl IndexCandidate {
    /// Creates a candidate from an ordered, non-empty field list
    pub fn new(fields: Vec<String>) -> Self {
        debug_assert!(!fields.is_empty(), "candidate indexes are non-empty");
        Self { fields }
    }

    /// The indexed fields, in index order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of indexed fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Candidates are never empty; provided for completeness
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for IndexCandidate {
    /// Renders in index-creation syntax: `{"a": 1, "b": 1}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{}\": 1", field)?;
        }
        write!(f, "}}")
    }
}

/// Deduplicated candidate set preserving first-seen order
#[derive(Debug, Default)]
pub struct CandidateSet {
    ordered: Vec<IndexCandidate>,
    seen: HashSet<IndexCandidate>,
}

impl CandidateSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerates all candidates for a workload.
    ///
    /// For each query, every k-permutation (k up to `max_fields`) of the
    /// fields the query reads. The degenerate `("_id")` index always exists
    /// and is excluded.
    pub fn from_workload(workload: &[Query], max_fields: usize) -> Self {
        let mut set = Self::new();
        for query in workload {
            let fields = query.read_fields();
            let longest = fields.len().min(max_fields);
            for k in 1..=longest {
                permute(&fields, k, &mut |permutation| set.insert_fields(permutation));
            }
        }
        set
    }

    fn insert_fields(&mut self, fields: &[&str]) {
        if fields.len() == 1 && fields[0] == "_id" {
            return;
        }
        let candidate = IndexCandidate::new(fields.iter().map(|f| f.to_string()).collect());
        if self.seen.insert(candidate.clone()) {
            self.ordered.push(candidate);
        }
    }

    /// Candidates in enumeration order
    pub fn candidates(&self) -> &[IndexCandidate] {
        &self.ordered
    }

    /// Number of distinct candidates
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// True if no candidate was enumerated
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Visits every k-permutation of `fields`, in positional order
fn permute<'a>(fields: &[&'a str], k: usize, visit: &mut impl FnMut(&[&'a str])) {
    fn descend<'a>(
        fields: &[&'a str],
        k: usize,
        current: &mut Vec<&'a str>,
        visit: &mut impl FnMut(&[&'a str]),
    ) {
        if current.len() == k {
            visit(current);
            return;
        }
        for &field in fields {
            if !current.contains(&field) {
                current.push(field);
                descend(fields, k, current, visit);
                current.pop();
            }
        }
    }

    let mut current = Vec::with_capacity(k);
    descend(fields, k, &mut current, visit);
}
