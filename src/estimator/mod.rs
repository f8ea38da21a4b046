//! Sample-based cardinality estimation
//!
//! Counts are taken against the persisted sample and scaled back to the full
//! collection by `N / n`. Key-count queries with a widened last field are
//! answered with a distinct-count over the retained fields; an equality-only
//! prefix touches exactly one index entry per matching document, so its key
//! count equals its document count.

mod cache;

use crate::driver::{CollectionDriver, DriverResult};
use crate::query::Query;
use crate::sampler::SampleHandle;

pub use cache::{EstimateCache, EstimateKind};

/// Answers cardinality questions from the sample
pub struct Estimator<'a, D: CollectionDriver> {
    driver: &'a D,
    sample: SampleHandle,
}

impl<'a, D: CollectionDriver> Estimator<'a, D> {
    /// Creates an estimator over a materialized sample
    pub fn new(driver: &'a D, sample: SampleHandle) -> Self {
        Self { driver, sample }
    }

    /// Size of the source collection
    pub fn collection_count(&self) -> u64 {
        self.sample.collection_count
    }

    /// Estimated number of documents in the collection matching the query
    pub fn estimate(&self, query: &Query) -> DriverResult<f64> {
        let matched = self
            .driver
            .count_documents(&self.sample.sample, query.filter())?;
        Ok(matched as f64 * self.scale())
    }

    /// Estimated number of index keys a scan described by a key-count query
    /// touches
    pub fn estimate_index_keys(&self, query: &Query) -> DriverResult<f64> {
        if !query.filter().has_exists() {
            return self.estimate(query);
        }

        let fields: Vec<String> = query
            .fields()
            .into_iter()
            .map(|field| field.to_string())
            .collect();
        let distinct = self
            .driver
            .distinct_count(&self.sample.sample, &fields, query.filter())?;
        Ok(distinct as f64 * self.scale())
    }

    fn scale(&self) -> f64 {
        if self.sample.sample_size == 0 {
            0.0
        } else {
            self.sample.collection_count as f64 / self.sample.sample_size as f64
        }
    }
}
