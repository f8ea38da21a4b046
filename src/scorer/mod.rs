//! Cost model scoring
//!
//! Scores every (query, candidate) pair into a dense benefit matrix. The
//! benefit of an index for a query is the cost of a full collection scan
//! minus the modeled cost of serving the query through the index:
//!
//! - every scanned index key costs `ixscan_cost`, plus `index_field_cost`
//!   for each index field beyond the first
//! - every matched document costs `fetch_cost`, unless the index covers the
//!   query
//! - when a limit applies and the index filters on all predicates, both key
//!   and document counts are capped at the limit
//! - an index that satisfies the requested sort order is credited the
//!   eliminated `e * log2(e)` sort work, weighted by `sort_cost`
//!
//! An index whose leading field the query does not filter on is unusable and
//! scores zero. Estimates are memoized across the whole matrix build.

mod matrix;

use crate::candidates::IndexCandidate;
use crate::driver::{CollectionDriver, DriverResult};
use crate::engine::CostModel;
use crate::estimator::{EstimateCache, EstimateKind, Estimator};
use crate::query::Query;

pub use matrix::BenefitMatrix;

/// Builds the workload-by-candidate benefit matrix
pub struct Scorer<'a, D: CollectionDriver> {
    estimator: Estimator<'a, D>,
    cache: EstimateCache,
    cost: CostModel,
}

impl<'a, D: CollectionDriver> Scorer<'a, D> {
    /// Creates a scorer over an estimator and a set of cost constants
    pub fn new(estimator: Estimator<'a, D>, cost: CostModel) -> Self {
        Self {
            estimator,
            cache: EstimateCache::new(),
            cost,
        }
    }

    /// Scores every workload query against every candidate
    pub fn build_matrix(
        &mut self,
        workload: &[Query],
        candidates: &[IndexCandidate],
    ) -> DriverResult<BenefitMatrix> {
        let mut matrix = BenefitMatrix::new(workload.len(), candidates.len());
        for (row, query) in workload.iter().enumerate() {
            for (col, candidate) in candidates.iter().enumerate() {
                matrix.set(row, col, self.benefit(query, candidate)?);
            }
        }
        Ok(matrix)
    }

    /// The modeled benefit of one candidate for one query
    pub fn benefit(&mut self, query: &Query, candidate: &IndexCandidate) -> DriverResult<f64> {
        let prefix = query.index_intersect(candidate.fields());
        if prefix.filter().is_empty() {
            // The index cannot narrow this query; the baseline scan stands
            return Ok(0.0);
        }

        let mut documents = self.documents_estimate(&prefix)?;

        let key_query = query.index_number_key_query(candidate.fields());
        let mut keys = self.index_keys_estimate(&key_query)?;

        if let Some(limit) = query.limit() {
            if query.is_subset(candidate.fields()) {
                let cap = limit as f64;
                documents = documents.min(cap);
                keys = keys.min(cap);
            }
        }

        let per_key =
            self.cost.ixscan_cost + (candidate.len() - 1) as f64 * self.cost.index_field_cost;
        let mut index_cost = per_key * keys;

        if !query.is_covered(candidate.fields()) {
            index_cost += self.cost.fetch_cost * documents;
        }

        let mut benefit = self.estimator.collection_count() as f64 - index_cost;

        if query.can_use_sort(candidate.fields()) {
            // The guard keeps log2 well-defined for empty estimates
            let sorted = self.documents_estimate(query)?.max(1.0);
            benefit += sorted * sorted.log2() * self.cost.sort_cost;
        }

        Ok(benefit)
    }

    /// Memoized estimates, exposed for diagnostics
    pub fn cache(&self) -> &EstimateCache {
        &self.cache
    }

    fn documents_estimate(&mut self, query: &Query) -> DriverResult<f64> {
        if let Some(hit) = self.cache.get(EstimateKind::Documents, query) {
            return Ok(hit);
        }
        let estimate = self.estimator.estimate(query)?;
        self.cache.insert(EstimateKind::Documents, query, estimate);
        Ok(estimate)
    }

    fn index_keys_estimate(&mut self, query: &Query) -> DriverResult<f64> {
        if let Some(hit) = self.cache.get(EstimateKind::IndexKeys, query) {
            return Ok(hit);
        }
        let estimate = self.estimator.estimate_index_keys(query)?;
        self.cache.insert(EstimateKind::IndexKeys, query, estimate);
        Ok(estimate)
    }
}
