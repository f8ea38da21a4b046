//! Query construction errors
//!
//! All query errors are per-entry: the workload ingester logs and skips the
//! offending entry, it never aborts the run.

use thiserror::Error;

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while normalizing an MQL filter document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The filter expression is not a document
    #[error("filter must be a document, found {0}")]
    FilterNotDocument(&'static str),

    /// Top-level operators ($and, $or, $where, ...) are not modeled
    #[error("unsupported top-level operator '{0}'")]
    TopLevelOperator(String),

    /// An operator the model does not recognize
    #[error("unsupported operator '{op}' on field '{field}'")]
    UnsupportedOperator { field: String, op: String },

    /// $in requires a non-empty array
    #[error("$in on field '{0}' must be a non-empty array")]
    MalformedIn(String),

    /// A predicate document mixes operators with plain keys
    #[error("field '{0}' mixes operators with plain values")]
    MixedPredicate(String),
}
