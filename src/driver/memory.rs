//! In-memory collection driver
//!
//! Holds namespaces of JSON documents behind a mutex and answers every
//! driver call in process. Sampling uses a seeded RNG so repeated runs over
//! the same data produce the same sample.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::{Map, Value};

use crate::candidates::IndexCandidate;
use crate::query::{total_order, DocumentMatcher, Filter, Query};

use super::{CollectionDriver, DriverError, DriverResult, Namespace};

const DEFAULT_SEED: u64 = 0x00C0_FFEE;

/// In-process [`CollectionDriver`] over JSON documents
#[derive(Debug)]
pub struct MemoryDriver {
    collections: Mutex<HashMap<Namespace, Vec<Value>>>,
    indexes: Mutex<HashMap<Namespace, Vec<IndexCandidate>>>,
    seed: u64,
}

impl MemoryDriver {
    /// Creates an empty driver with the default sampling seed
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates an empty driver with an explicit sampling seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            indexes: Mutex::new(HashMap::new()),
            seed,
        }
    }

    /// Loads a collection, replacing any previous contents
    pub fn insert_collection(&self, ns: Namespace, documents: Vec<Value>) {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        collections.insert(ns, documents);
    }

    /// Indexes created on a namespace, in creation order
    pub fn indexes_for(&self, ns: &Namespace) -> Vec<IndexCandidate> {
        let indexes = self.indexes.lock().unwrap_or_else(PoisonError::into_inner);
        indexes.get(ns).cloned().unwrap_or_default()
    }

    fn with_documents<T>(&self, ns: &Namespace, read: impl FnOnce(&[Value]) -> T) -> T {
        let collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match collections.get(ns) {
            Some(documents) => read(documents),
            None => read(&[]),
        }
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionDriver for MemoryDriver {
    fn count(&self, ns: &Namespace) -> DriverResult<u64> {
        Ok(self.with_documents(ns, |documents| documents.len() as u64))
    }

    fn find(&self, ns: &Namespace, filter: &Filter) -> DriverResult<Vec<Value>> {
        Ok(self.with_documents(ns, |documents| {
            documents
                .iter()
                .filter(|document| DocumentMatcher::matches(document, filter))
                .cloned()
                .collect()
        }))
    }

    fn count_documents(&self, ns: &Namespace, filter: &Filter) -> DriverResult<u64> {
        Ok(self.with_documents(ns, |documents| {
            documents
                .iter()
                .filter(|document| DocumentMatcher::matches(document, filter))
                .count() as u64
        }))
    }

    fn distinct_count(
        &self,
        ns: &Namespace,
        fields: &[String],
        filter: &Filter,
    ) -> DriverResult<u64> {
        Ok(self.with_documents(ns, |documents| {
            let mut keys: HashSet<String> = HashSet::new();
            for document in documents {
                if !DocumentMatcher::matches(document, filter) {
                    continue;
                }
                let key: Vec<String> = fields
                    .iter()
                    .map(|field| {
                        DocumentMatcher::lookup_path(document, field)
                            .map(|value| value.to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                keys.insert(key.join("\u{1f}"));
            }
            keys.len() as u64
        }))
    }

    fn materialize_sample(
        &self,
        source: &Namespace,
        dest: &Namespace,
        size: u64,
    ) -> DriverResult<u64> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let sample = {
            let documents = collections
                .get(source)
                .ok_or_else(|| DriverError::NamespaceNotFound(source.clone()))?;
            let take = (size as usize).min(documents.len());
            // Seeded, so the same source yields the same sample on reruns
            let mut rng = StdRng::seed_from_u64(self.seed);
            let sample: Vec<Value> =
                documents.choose_multiple(&mut rng, take).cloned().collect();
            sample
        };

        let materialized = sample.len() as u64;
        collections.insert(dest.clone(), sample);
        Ok(materialized)
    }

    fn drop_collection(&self, ns: &Namespace) -> DriverResult<()> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        collections.remove(ns);

        let mut indexes = self.indexes.lock().unwrap_or_else(PoisonError::into_inner);
        indexes.remove(ns);

        Ok(())
    }

    fn create_index(&self, ns: &Namespace, index: &IndexCandidate) -> DriverResult<()> {
        let mut indexes = self.indexes.lock().unwrap_or_else(PoisonError::into_inner);
        let created = indexes.entry(ns.clone()).or_default();
        if !created.contains(index) {
            created.push(index.clone());
        }
        Ok(())
    }

    fn execute_workload(&self, ns: &Namespace, workload: &[Query]) -> DriverResult<Duration> {
        let start = Instant::now();
        for query in workload {
            self.with_documents(ns, |documents| run_query(documents, query));
        }
        Ok(start.elapsed())
    }
}

/// Filter, sort, limit, project; the executed shape of one find query
fn run_query(documents: &[Value], query: &Query) -> Vec<Value> {
    let mut results: Vec<Value> = documents
        .iter()
        .filter(|document| DocumentMatcher::matches(document, query.filter()))
        .cloned()
        .collect();

    if !query.sort().is_empty() {
        results.sort_by(|a, b| {
            for field in query.sort() {
                let ordering = total_order(
                    DocumentMatcher::lookup_path(a, field),
                    DocumentMatcher::lookup_path(b, field),
                );
                if ordering != std::cmp::Ordering::Equal {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    if let Some(limit) = query.limit() {
        results.truncate(limit as usize);
    }

    if !query.projection().is_empty() {
        results = results
            .iter()
            .map(|document| project(document, query.projection()))
            .collect();
    }

    results
}

fn project(document: &Value, fields: &[String]) -> Value {
    let mut projected = Map::new();
    for field in fields {
        if let Some(value) = DocumentMatcher::lookup_path(document, field) {
            projected.insert(field.clone(), value.clone());
        }
    }
    Value::Object(projected)
}
