//! CLI argument definitions using clap
//!
//! Usage:
//! - mindexer recommend --data <docs.json> --profile <profile.json> -d <db> -c <coll>
//! - mindexer evaluate --data <docs.json> --profile <profile.json> -d <db> -c <coll>

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// mindexer - index recommendations for document databases
#[derive(Parser, Debug)]
#[command(name = "mindexer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parses process arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recommend indexes for a recorded workload
    Recommend(RunArgs),

    /// Recommend indexes, create them, and time the workload before/after
    Evaluate(RunArgs),
}

/// Arguments shared by both commands
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the collection data set (JSON array of documents)
    #[arg(long)]
    pub data: PathBuf,

    /// Path to the recorded profile log (JSON array of profile entries)
    #[arg(long)]
    pub profile: PathBuf,

    /// Database name
    #[arg(short = 'd', long)]
    pub db: String,

    /// Collection name
    #[arg(short = 'c', long)]
    pub collection: String,

    /// Path to an engine configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fraction of the collection to sample, in (0, 1)
    #[arg(long)]
    pub sample_ratio: Option<f64>,

    /// Explicit sample size; overrides the ratio
    #[arg(long)]
    pub sample_size: Option<u64>,

    /// Maximum number of recommended indexes (0 = unlimited)
    #[arg(long)]
    pub max_indexes: Option<usize>,

    /// Maximum number of fields per candidate index
    #[arg(long)]
    pub max_index_fields: Option<usize>,

    /// Print per-index benefits and workload details
    #[arg(short, long)]
    pub verbose: bool,
}
