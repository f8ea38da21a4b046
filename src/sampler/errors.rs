//! Sampler error types
//!
//! All sampler errors abort the run before any scoring happens.

use thiserror::Error;

use crate::driver::{DriverError, Namespace};

/// Result type for sampler operations
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Errors raised while establishing or tearing down the sample
#[derive(Debug, Error)]
pub enum SamplerError {
    /// The source collection holds no documents
    #[error("source collection {0} is empty")]
    EmptyCollection(Namespace),

    /// The sample database is configured to be the source database
    #[error("sample database '{0}' must be distinct from the source database")]
    SampleDbNotDistinct(String),

    /// The driver could not materialize the sample
    #[error("failed to materialize sample: {0}")]
    SampleUnavailable(#[source] DriverError),

    /// Any other driver failure during sample management
    #[error(transparent)]
    Driver(#[from] DriverError),
}
