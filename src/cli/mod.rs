//! Command-line interface
//!
//! Commands:
//! - recommend: propose indexes for a recorded workload
//! - evaluate: propose, create, and time the workload before and after
//!
//! Both commands run against JSON files: a data set (array of documents)
//! loaded into the in-memory driver, and a profile log (array of profile
//! entries) ingested into the workload.

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, RunArgs};
pub use commands::run_command;
pub use errors::{CliError, CliResult};
