//! Engine error types
//!
//! Aggregates subsystem errors. Everything surfaced here is fatal for the
//! run; per-query problems are handled upstream by the workload ingester.

use thiserror::Error;

use crate::driver::DriverError;
use crate::sampler::SamplerError;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal errors of an engine run
#[derive(Debug, Error)]
pub enum EngineError {
    /// A tunable is out of range or the config file is unreadable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sample establishment or teardown failed
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    /// The driver failed during estimation
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl EngineError {
    /// Stable machine-readable code for error envelopes
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "MINDEXER_INVALID_CONFIG",
            Self::Sampler(SamplerError::EmptyCollection(_)) => "MINDEXER_EMPTY_COLLECTION",
            Self::Sampler(SamplerError::SampleDbNotDistinct(_)) => {
                "MINDEXER_SAMPLE_DB_NOT_DISTINCT"
            }
            Self::Sampler(SamplerError::SampleUnavailable(_)) => "MINDEXER_SAMPLE_UNAVAILABLE",
            Self::Sampler(SamplerError::Driver(_)) | Self::Driver(_) => "MINDEXER_DRIVER_ERROR",
        }
    }
}
