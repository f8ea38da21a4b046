//! CLI command implementations
//!
//! Commands load the data set into the in-memory driver, ingest the profile
//! log into a workload, and run the engine. Output mirrors the database's
//! index-creation syntax, one index per line.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::driver::{CollectionDriver, MemoryDriver, Namespace};
use crate::engine::{Engine, EngineConfig, Recommendation};
use crate::profile;
use crate::query::Query;

use super::args::{Command, RunArgs};
use super::errors::{CliError, CliResult};

/// Dispatches a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Recommend(args) => recommend(&args),
        Command::Evaluate(args) => evaluate(&args),
    }
}

fn recommend(args: &RunArgs) -> CliResult<()> {
    let (driver, source, config, workload) = prepare(args)?;

    let engine = Engine::new(&driver, source, config)?;
    let recommendations = engine.recommend(&workload)?;

    print_recommendations(&recommendations, &workload, args.verbose);
    Ok(())
}

fn evaluate(args: &RunArgs) -> CliResult<()> {
    let (driver, source, config, workload) = prepare(args)?;

    let engine = Engine::new(&driver, source.clone(), config)?;
    let recommendations = engine.recommend(&workload)?;

    print_recommendations(&recommendations, &workload, args.verbose);

    let before = driver.execute_workload(&source, &workload)?;
    for recommendation in &recommendations {
        driver.create_index(&source, &recommendation.index)?;
    }
    let after = driver.execute_workload(&source, &workload)?;

    println!(
        ">> workload duration without indexes: {:.3}s",
        before.as_secs_f64()
    );
    println!(
        ">> workload duration with {} indexes: {:.3}s",
        recommendations.len(),
        after.as_secs_f64()
    );
    Ok(())
}

fn prepare(args: &RunArgs) -> CliResult<(MemoryDriver, Namespace, EngineConfig, Vec<Query>)> {
    let source = Namespace::new(args.db.clone(), args.collection.clone());

    let documents = read_json_array(&args.data)?;
    let entries = read_json_array(&args.profile)?;

    let driver = MemoryDriver::new();
    driver.insert_collection(source.clone(), documents);

    let workload = profile::workload_from_profile(&entries, &source);

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(sample_ratio) = args.sample_ratio {
        config.sample_ratio = sample_ratio;
    }
    if let Some(sample_size) = args.sample_size {
        config.sample_size = Some(sample_size);
    }
    if let Some(max_indexes) = args.max_indexes {
        config.max_indexes = max_indexes;
    }
    if let Some(max_index_fields) = args.max_index_fields {
        config.max_index_fields = max_index_fields;
    }

    Ok((driver, source, config, workload))
}

fn read_json_array(path: &Path) -> CliResult<Vec<Value>> {
    let display = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| CliError::Io {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| CliError::Parse {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    match parsed {
        Value::Array(entries) => Ok(entries),
        _ => Err(CliError::NotAnArray { path: display }),
    }
}

fn print_recommendations(
    recommendations: &[Recommendation],
    workload: &[Query],
    verbose: bool,
) {
    if verbose {
        println!(">> workload: {} queries", workload.len());
    }

    if recommendations.is_empty() {
        println!(">> no beneficial indexes found");
        return;
    }

    println!(">> recommending the following indexes:");
    for recommendation in recommendations {
        println!("{}", recommendation.index);
        if verbose {
            println!("   estimated benefit: {:.2}", recommendation.benefit);
        }
    }
}
