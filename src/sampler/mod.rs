//! Sample lifecycle
//!
//! Materializes a uniform random sample of the source collection into a
//! dedicated sample database and owns it for the duration of one engine
//! run. A persisted sample of the right size is reused; everything else is
//! dropped and rebuilt. The sampler is also where the two fatal
//! preconditions are checked: the source collection must be non-empty and
//! the sample database must be distinct from the source database.

mod errors;

use chrono::{DateTime, Utc};

use crate::driver::{CollectionDriver, Namespace};
use crate::engine::EngineConfig;
use crate::observability::Logger;

pub use errors::{SamplerError, SamplerResult};

/// Reference to a persisted uniform sample of a source collection
#[derive(Debug, Clone)]
pub struct SampleHandle {
    /// The sampled collection
    pub source: Namespace,
    /// Where the sample lives
    pub sample: Namespace,
    /// Number of documents in the sample
    pub sample_size: u64,
    /// Number of documents in the source collection
    pub collection_count: u64,
    /// True if a persisted sample was adopted instead of materialized
    pub reused: bool,
    /// When this handle was established
    pub created_at: DateTime<Utc>,
}

/// Owns the sample collection for one engine run
#[derive(Debug)]
pub struct Sampler<'a, D: CollectionDriver> {
    driver: &'a D,
    source: Namespace,
    sample_ns: Namespace,
    collection_count: u64,
    target_size: u64,
}

impl<'a, D: CollectionDriver> Sampler<'a, D> {
    /// Validates preconditions and computes the target sample size.
    ///
    /// An explicit `sample_size` wins over the ratio and is clamped to the
    /// collection size. With a ratio, collections small enough that the
    /// scaled size falls below the minimum are sampled at
    /// `min(count, min_sample_size)`.
    pub fn new(driver: &'a D, source: Namespace, config: &EngineConfig) -> SamplerResult<Self> {
        if source.db == config.sample_db {
            return Err(SamplerError::SampleDbNotDistinct(config.sample_db.clone()));
        }

        let collection_count = driver.count(&source)?;
        if collection_count == 0 {
            return Err(SamplerError::EmptyCollection(source));
        }

        let target_size = target_sample_size(collection_count, config);
        let sample_ns = Namespace::new(
            config.sample_db.clone(),
            format!("{}_{}", source.db, source.collection),
        );

        Ok(Self {
            driver,
            source,
            sample_ns,
            collection_count,
            target_size,
        })
    }

    /// Size of the source collection
    pub fn collection_count(&self) -> u64 {
        self.collection_count
    }

    /// Sample size this run will use
    pub fn target_size(&self) -> u64 {
        self.target_size
    }

    /// Returns a handle to a sample of the target size, reusing a persisted
    /// sample when its size already matches and materializing one otherwise.
    pub fn ensure_sample(&self) -> SamplerResult<SampleHandle> {
        let namespace = self.sample_ns.to_string();

        let existing = self.driver.count(&self.sample_ns)?;
        if existing == self.target_size {
            let size = existing.to_string();
            Logger::info(
                "sample_reused",
                &[("namespace", namespace.as_str()), ("size", size.as_str())],
            );
            return Ok(self.handle(existing, true));
        }

        if existing > 0 {
            self.driver.drop_collection(&self.sample_ns)?;
        }

        let materialized = self
            .driver
            .materialize_sample(&self.source, &self.sample_ns, self.target_size)
            .map_err(SamplerError::SampleUnavailable)?;

        let size = materialized.to_string();
        Logger::info(
            "sample_materialized",
            &[("namespace", namespace.as_str()), ("size", size.as_str())],
        );

        Ok(self.handle(materialized, false))
    }

    /// Deletes the persisted sample; safe to call when none exists
    pub fn drop_sample(&self) -> SamplerResult<()> {
        self.driver.drop_collection(&self.sample_ns)?;

        let namespace = self.sample_ns.to_string();
        Logger::info("sample_dropped", &[("namespace", namespace.as_str())]);
        Ok(())
    }

    fn handle(&self, sample_size: u64, reused: bool) -> SampleHandle {
        SampleHandle {
            source: self.source.clone(),
            sample: self.sample_ns.clone(),
            sample_size,
            collection_count: self.collection_count,
            reused,
            created_at: Utc::now(),
        }
    }
}

fn target_sample_size(collection_count: u64, config: &EngineConfig) -> u64 {
    if let Some(size) = config.sample_size {
        return size.min(collection_count);
    }

    let scaled = collection_count as f64 * config.sample_ratio;
    if scaled <= config.min_sample_size as f64 {
        collection_count.min(config.min_sample_size)
    } else {
        scaled.ceil() as u64
    }
}
