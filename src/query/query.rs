//! The normalized query and its index-oriented derivations

use serde_json::Value;

use super::errors::QueryResult;
use super::filter::Filter;
use super::mql;
use super::predicate::Predicate;

/// A normalized read request.
///
/// Immutable once constructed; the derivation methods return new queries.
/// Sort directions are not tracked, only the sorted field sequence matters
/// for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    filter: Filter,
    sort: Vec<String>,
    limit: Option<u64>,
    projection: Vec<String>,
}

impl Query {
    /// Creates a query from a filter, without sort, limit, or projection
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            sort: Vec::new(),
            limit: None,
            projection: Vec::new(),
        }
    }

    /// Parses an MQL filter document into a query
    pub fn from_mql(filter: &Value) -> QueryResult<Self> {
        Ok(Self::new(mql::parse_filter(filter)?))
    }

    /// Sets the sorted field sequence
    pub fn with_sort(mut self, sort: Vec<String>) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the result limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the include-projection field set
    pub fn with_projection(mut self, projection: Vec<String>) -> Self {
        self.projection = projection;
        self
    }

    /// The filter
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Sorted field sequence, possibly empty
    pub fn sort(&self) -> &[String] {
        &self.sort
    }

    /// Result limit, if any
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Include-projection fields, empty when the query returns whole documents
    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    /// Filter field names, in the insertion order of the original expression
    pub fn fields(&self) -> Vec<&str> {
        self.filter.fields().collect()
    }

    /// Every field the query reads: filter, then sort, then projection
    /// fields, first occurrence wins.
    pub fn read_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for field in self.filter.fields() {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        for field in &self.sort {
            if !fields.contains(&field.as_str()) {
                fields.push(field);
            }
        }
        for field in &self.projection {
            if !fields.contains(&field.as_str()) {
                fields.push(field);
            }
        }
        fields
    }

    /// The prefix-intersection of this query's filter with an index.
    ///
    /// Walks the index left to right, keeping the fields this filter
    /// constrains, and stops at the first index field the filter does not
    /// mention: an index serves a filter only up to its first unmatched
    /// prefix field. Sort, limit, and projection carry over unchanged.
    pub fn index_intersect(&self, index: &[String]) -> Query {
        let mut filter = Filter::new();
        for field in index {
            match self.filter.get(field) {
                Some(predicate) => filter.push(field.clone(), predicate.clone()),
                None => break,
            }
        }

        Query {
            filter,
            sort: self.sort.clone(),
            limit: self.limit,
            projection: self.projection.clone(),
        }
    }

    /// The query describing which index keys a scan of this index touches:
    /// the prefix-intersection with the last retained field widened so that
    /// multi-key predicates count every key under the scanned bounds.
    pub fn index_number_key_query(&self, index: &[String]) -> Query {
        let mut kept: Vec<(&String, &Predicate)> = Vec::new();
        for field in index {
            match self.filter.get(field) {
                Some(predicate) => kept.push((field, predicate)),
                None => break,
            }
        }

        let mut filter = Filter::new();
        let last = kept.len().saturating_sub(1);
        for (position, (field, predicate)) in kept.into_iter().enumerate() {
            let predicate = if position == last {
                predicate.widened()
            } else {
                predicate.clone()
            };
            filter.push(field.clone(), predicate);
        }

        Query {
            filter,
            sort: self.sort.clone(),
            limit: self.limit,
            projection: self.projection.clone(),
        }
    }

    /// True iff every filter field appears in the index. Only then does a
    /// result limit cap the number of keys and documents examined.
    pub fn is_subset(&self, index: &[String]) -> bool {
        self.filter.fields().all(|field| contains(index, field))
    }

    /// True iff the index alone can answer the query, so no document fetch
    /// is needed. A query without an include-projection returns whole
    /// documents and is never covered.
    pub fn is_covered(&self, index: &[String]) -> bool {
        if self.projection.is_empty() {
            return false;
        }
        self.read_fields()
            .iter()
            .all(|field| contains(index, field))
    }

    /// True iff the index yields rows in the requested sort order without a
    /// blocking sort stage: after stripping the maximal leading run of
    /// equality-constrained fields, the index must continue with exactly the
    /// sorted field sequence.
    pub fn can_use_sort(&self, index: &[String]) -> bool {
        if self.sort.is_empty() {
            return false;
        }

        let mut start = 0;
        while start < index.len()
            && self
                .filter
                .get(&index[start])
                .is_some_and(Predicate::is_equality)
        {
            start += 1;
        }

        let rest = &index[start..];
        rest.len() >= self.sort.len()
            && rest.iter().zip(&self.sort).all(|(index_field, sort_field)| {
                index_field == sort_field
            })
    }
}

fn contains(index: &[String], field: &str) -> bool {
    index.iter().any(|index_field| index_field == field)
}
