//! CLI error types
//!
//! Everything surfaced here terminates the process with a JSON error
//! envelope on stderr.

use thiserror::Error;

use crate::driver::DriverError;
use crate::engine::EngineError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// Errors raised by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// An input file is not valid JSON
    #[error("{path} is not valid JSON: {reason}")]
    Parse { path: String, reason: String },

    /// An input file does not hold a JSON array
    #[error("{path} must contain a JSON array")]
    NotAnArray { path: String },

    /// The engine aborted
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The driver failed outside the engine (evaluation harness)
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl CliError {
    /// Stable machine-readable code for the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "MINDEXER_IO_ERROR",
            Self::Parse { .. } | Self::NotAnArray { .. } => "MINDEXER_PARSE_ERROR",
            Self::Engine(error) => error.code(),
            Self::Driver(_) => "MINDEXER_DRIVER_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_codes_pass_through() {
        let error: CliError = EngineError::InvalidConfig("bad".into()).into();
        assert_eq!(error.code(), "MINDEXER_INVALID_CONFIG");
    }

    #[test]
    fn test_io_code() {
        let error = CliError::Io {
            path: "x.json".into(),
            reason: "gone".into(),
        };
        assert_eq!(error.code(), "MINDEXER_IO_ERROR");
    }
}
