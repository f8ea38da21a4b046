//! Observability for the recommendation pipeline
//!
//! Provides structured JSON logging with:
//! - One log line = one event
//! - Deterministic key ordering
//! - Explicit severity levels
//! - Synchronous writes, no buffering

mod logger;

pub use logger::{Logger, Severity};
