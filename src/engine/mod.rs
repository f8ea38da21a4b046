//! Engine orchestration
//!
//! Wires the pipeline for one run: establish the sample, enumerate
//! candidates from the workload, score the benefit matrix, select greedily,
//! and drop the sample. The sample is dropped on the error path too; a run
//! never leaks its sample collection.

mod config;
mod errors;

use crate::candidates::{CandidateSet, IndexCandidate};
use crate::driver::{CollectionDriver, Namespace};
use crate::estimator::Estimator;
use crate::observability::Logger;
use crate::query::Query;
use crate::sampler::{SampleHandle, Sampler};
use crate::scorer::Scorer;
use crate::selector::GreedySelector;

pub use config::{CostModel, EngineConfig};
pub use errors::{EngineError, EngineResult};

/// One recommended index, paired with the selection-round workload benefit
/// that won it
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// The recommended compound index
    pub index: IndexCandidate,
    /// Estimated workload benefit at selection time
    pub benefit: f64,
}

/// The index recommendation engine for one source collection
pub struct Engine<'a, D: CollectionDriver> {
    driver: &'a D,
    source: Namespace,
    config: EngineConfig,
}

impl<'a, D: CollectionDriver> Engine<'a, D> {
    /// Creates an engine after validating the configuration
    pub fn new(driver: &'a D, source: Namespace, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            driver,
            source,
            config,
        })
    }

    /// The validated configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recommends indexes for the workload, in selection order.
    ///
    /// Partial results are never returned: any driver failure mid-run aborts
    /// the whole recommendation.
    pub fn recommend(&self, workload: &[Query]) -> EngineResult<Vec<Recommendation>> {
        if workload.is_empty() {
            let namespace = self.source.to_string();
            Logger::warn("empty_workload", &[("namespace", namespace.as_str())]);
            return Ok(Vec::new());
        }

        let sampler = Sampler::new(self.driver, self.source.clone(), &self.config)?;
        let sample = sampler.ensure_sample()?;

        // Score with the sample in place, then drop it regardless of outcome
        let outcome = self.score_and_select(workload, &sample);
        let dropped = sampler.drop_sample();

        let recommendations = outcome?;
        dropped?;
        Ok(recommendations)
    }

    fn score_and_select(
        &self,
        workload: &[Query],
        sample: &SampleHandle,
    ) -> EngineResult<Vec<Recommendation>> {
        let candidates = CandidateSet::from_workload(workload, self.config.max_index_fields);

        let count = candidates.len().to_string();
        let queries = workload.len().to_string();
        Logger::info(
            "candidates_generated",
            &[("candidates", count.as_str()), ("queries", queries.as_str())],
        );

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let estimator = Estimator::new(self.driver, sample.clone());
        let mut scorer = Scorer::new(estimator, self.config.cost.clone());
        let matrix = scorer.build_matrix(workload, candidates.candidates())?;

        let selections =
            GreedySelector::new(matrix, self.config.max_indexes).select(candidates.candidates());

        for selection in &selections {
            let index = selection.index.to_string();
            let benefit = format!("{:.2}", selection.benefit);
            Logger::info(
                "index_selected",
                &[("benefit", benefit.as_str()), ("index", index.as_str())],
            );
        }

        Ok(selections
            .into_iter()
            .map(|selection| Recommendation {
                index: selection.index,
                benefit: selection.benefit,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MemoryDriver;
    use serde_json::json;

    fn source() -> Namespace {
        Namespace::new("vehicles", "registrations")
    }

    fn exact_config() -> EngineConfig {
        EngineConfig {
            sample_size: Some(1000),
            ..EngineConfig::default()
        }
    }

    fn driver_with_selective_field() -> MemoryDriver {
        let driver = MemoryDriver::new();
        let documents = (0..1000)
            .map(|i| json!({"_id": i, "make": if i < 10 { "HYUND" } else { "OTHER" }}))
            .collect();
        driver.insert_collection(source(), documents);
        driver
    }

    #[test]
    fn test_empty_workload_recommends_nothing() {
        let driver = driver_with_selective_field();
        let engine = Engine::new(&driver, source(), exact_config()).unwrap();

        assert!(engine.recommend(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_recommends_selective_index() {
        let driver = driver_with_selective_field();
        let engine = Engine::new(&driver, source(), exact_config()).unwrap();

        let workload = vec![Query::from_mql(&json!({"make": "HYUND"})).unwrap()];
        let recommendations = engine.recommend(&workload).unwrap();

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].index.fields(), &["make".to_string()]);
        assert!(recommendations[0].benefit > 0.0);
    }

    #[test]
    fn test_sample_dropped_after_run() {
        let driver = driver_with_selective_field();
        let engine = Engine::new(&driver, source(), exact_config()).unwrap();

        let workload = vec![Query::from_mql(&json!({"make": "HYUND"})).unwrap()];
        engine.recommend(&workload).unwrap();

        let sample_ns = Namespace::new("mindexer_samples", "vehicles_registrations");
        assert_eq!(driver.count(&sample_ns).unwrap(), 0);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let driver = driver_with_selective_field();
        let config = EngineConfig {
            sample_ratio: 2.0,
            ..EngineConfig::default()
        };

        assert!(Engine::new(&driver, source(), config).is_err());
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let driver = driver_with_selective_field();
        let engine = Engine::new(&driver, source(), exact_config()).unwrap();

        let workload = vec![
            Query::from_mql(&json!({"make": "HYUND"})).unwrap(),
            Query::from_mql(&json!({"_id": {"$gt": 500}})).unwrap(),
        ];

        let first = engine.recommend(&workload).unwrap();
        let second = engine.recommend(&workload).unwrap();
        assert_eq!(first, second);
    }
}
