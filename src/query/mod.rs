//! Query model
//!
//! Normalized representation of one read request: a filter over single-field
//! predicates, plus sort, limit, and projection metadata. The scoring
//! pipeline derives per-index queries from it:
//!
//! - `index_intersect` - the filter prefix an index can serve
//! - `index_number_key_query` - the index keys a scan must touch
//! - `is_subset` / `is_covered` / `can_use_sort` - coverage tests
//!
//! Filters are constructed from MQL documents via [`Query::from_mql`];
//! unsupported operators fail construction and the caller skips the entry.

mod errors;
mod filter;
mod matcher;
mod mql;
mod predicate;
mod query;

pub use errors::{QueryError, QueryResult};
pub use filter::Filter;
pub use matcher::{compare_values, total_order, DocumentMatcher};
pub use predicate::{Predicate, RangeBounds};
pub use query::Query;
