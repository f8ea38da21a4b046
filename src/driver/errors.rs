//! Driver error types
//!
//! Any driver failure during estimation is fatal for the run: partial
//! recommendations computed from incomplete estimates would be biased.

use thiserror::Error;

use super::Namespace;

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors surfaced by a [`super::CollectionDriver`]
#[derive(Debug, Error)]
pub enum DriverError {
    /// The namespace does not exist where one is required
    #[error("namespace {0} does not exist")]
    NamespaceNotFound(Namespace),

    /// Any lower-level failure of the backing database
    #[error("driver failure: {0}")]
    Backend(String),
}
