//! Database driver boundary
//!
//! The engine talks to the database exclusively through [`CollectionDriver`].
//! A real deployment implements it over a network client; the bundled
//! [`MemoryDriver`] implements it over in-process JSON documents and backs
//! the CLI's file-based mode and the test suite.

mod errors;
mod memory;

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::candidates::IndexCandidate;
use crate::query::{Filter, Query};

pub use errors::{DriverError, DriverResult};
pub use memory::MemoryDriver;

/// A `database.collection` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Database name
    pub db: String,
    /// Collection name
    pub collection: String,
}

impl Namespace {
    /// Creates a namespace
    pub fn new(db: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.db, self.collection)
    }
}

/// Operations the engine needs from a database.
///
/// Counting methods treat a missing namespace as empty rather than an error,
/// matching document-database semantics. `materialize_sample` and
/// `drop_collection` are the only mutating calls the core issues;
/// `create_index` and `execute_workload` exist for the before/after
/// evaluation harness.
pub trait CollectionDriver {
    /// Total number of documents in the collection
    fn count(&self, ns: &Namespace) -> DriverResult<u64>;

    /// Documents matching the filter
    fn find(&self, ns: &Namespace, filter: &Filter) -> DriverResult<Vec<Value>>;

    /// Number of documents matching the filter
    fn count_documents(&self, ns: &Namespace, filter: &Filter) -> DriverResult<u64>;

    /// Number of distinct value tuples of `fields` among documents matching
    /// the filter
    fn distinct_count(
        &self,
        ns: &Namespace,
        fields: &[String],
        filter: &Filter,
    ) -> DriverResult<u64>;

    /// Persists a uniform random sample of `source` into `dest` and returns
    /// the materialized size
    fn materialize_sample(
        &self,
        source: &Namespace,
        dest: &Namespace,
        size: u64,
    ) -> DriverResult<u64>;

    /// Drops a collection; dropping a missing collection succeeds
    fn drop_collection(&self, ns: &Namespace) -> DriverResult<()>;

    /// Creates a compound index on the collection
    fn create_index(&self, ns: &Namespace, index: &IndexCandidate) -> DriverResult<()>;

    /// Runs every query of the workload and reports the wall-clock duration
    fn execute_workload(&self, ns: &Namespace, workload: &[Query]) -> DriverResult<Duration>;
}
