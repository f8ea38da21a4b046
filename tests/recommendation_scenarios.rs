//! End-to-end recommendation scenarios
//!
//! Each scenario runs the full pipeline against the in-memory driver with a
//! whole-collection sample, so every estimate is exact and the expected
//! benefits can be computed in closed form from the default cost constants.

use mindexer::driver::{CollectionDriver, MemoryDriver, Namespace};
use mindexer::engine::{Engine, EngineConfig};
use mindexer::query::Query;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

const COLLECTION: u64 = 10_000;

const IXSCAN_COST: f64 = 0.4;
const INDEX_FIELD_COST: f64 = 0.05;
const FETCH_COST: f64 = 9.5;
const SORT_COST: f64 = 10.0;

fn source() -> Namespace {
    Namespace::new("vehicles", "registrations")
}

/// Engine config sampling the whole collection: estimates become exact
fn exact_config() -> EngineConfig {
    EngineConfig {
        sample_size: Some(COLLECTION),
        ..EngineConfig::default()
    }
}

fn engine_over(documents: Vec<Value>) -> MemoryDriver {
    let driver = MemoryDriver::new();
    driver.insert_collection(source(), documents);
    driver
}

/// 10 000 documents; `a` is 1 for the first 100, unique elsewhere; `b`
/// carries a spread of values for sorting
fn selective_fixture() -> Vec<Value> {
    (0..COLLECTION)
        .map(|i| {
            json!({
                "_id": i,
                "a": if i < 100 { 1 } else { i + 1000 },
                "b": i % 37,
            })
        })
        .collect()
}

fn index_fields(recommendation: &mindexer::engine::Recommendation) -> Vec<&str> {
    recommendation
        .index
        .fields()
        .iter()
        .map(|f| f.as_str())
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

// =============================================================================
// Scenarios
// =============================================================================

/// Single equality, no sort: one candidate, fetch cost dominates.
#[test]
fn test_single_equality_query() {
    let driver = engine_over(selective_fixture());
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let workload = vec![Query::from_mql(&json!({"a": 1})).unwrap()];
    let recommendations = engine.recommend(&workload).unwrap();

    assert_eq!(recommendations.len(), 1);
    assert_eq!(index_fields(&recommendations[0]), vec!["a"]);

    let expected = COLLECTION as f64 - (IXSCAN_COST * 100.0 + FETCH_COST * 100.0);
    assert_close(recommendations[0].benefit, expected);
}

/// Covered query: the projection lies inside the index, no fetch term.
#[test]
fn test_covered_query_skips_fetch() {
    let driver = engine_over(selective_fixture());
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let workload = vec![Query::from_mql(&json!({"a": 1}))
        .unwrap()
        .with_projection(vec!["a".into()])];
    let recommendations = engine.recommend(&workload).unwrap();

    assert_eq!(index_fields(&recommendations[0]), vec!["a"]);

    let expected = COLLECTION as f64 - IXSCAN_COST * 100.0;
    assert_close(recommendations[0].benefit, expected);
}

/// Sort bonus: the compound index serving filter and sort wins over the
/// filter-only index.
#[test]
fn test_sort_bonus_prefers_compound_index() {
    let driver = engine_over(selective_fixture());
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let workload = vec![Query::from_mql(&json!({"a": 1}))
        .unwrap()
        .with_sort(vec!["b".into()])];
    let recommendations = engine.recommend(&workload).unwrap();

    assert!(!recommendations.is_empty());
    assert_eq!(index_fields(&recommendations[0]), vec!["a", "b"]);

    let e: f64 = 100.0;
    let expected = COLLECTION as f64
        - ((IXSCAN_COST + INDEX_FIELD_COST) * 100.0 + FETCH_COST * 100.0)
        + e * e.log2() * SORT_COST;
    assert_close(recommendations[0].benefit, expected);
}

/// Limit cap: when the index filters on every predicate, the limit bounds
/// both keys scanned and documents fetched.
#[test]
fn test_limit_caps_benefit_computation() {
    let documents = (0..COLLECTION)
        .map(|i| json!({"_id": i, "a": i}))
        .collect();
    let driver = engine_over(documents);
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let workload = vec![Query::from_mql(&json!({"a": {"$gt": 5}}))
        .unwrap()
        .with_limit(10)];
    let recommendations = engine.recommend(&workload).unwrap();

    assert_eq!(recommendations.len(), 1);
    assert_eq!(index_fields(&recommendations[0]), vec!["a"]);

    let expected = COLLECTION as f64 - (IXSCAN_COST * 10.0 + FETCH_COST * 10.0);
    assert_close(recommendations[0].benefit, expected);
}

/// Redundant second index: after the compound index is chosen, the prefix
/// index has no marginal value and selection stops.
#[test]
fn test_redundant_prefix_index_not_selected() {
    // 10 documents match both predicates; b alone matches 50, a alone 100,
    // so the compound index is strictly the best single choice
    let documents = (0..COLLECTION)
        .map(|i| {
            json!({
                "_id": i,
                "a": if i < 100 { 1 } else { i + 1000 },
                "b": if i < 10 || (5000..5040).contains(&i) { 1 } else { i + 20_000 },
            })
        })
        .collect();
    let driver = engine_over(documents);
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let query = Query::from_mql(&json!({"a": 1, "b": 1})).unwrap();
    let workload = vec![query.clone(), query];
    let recommendations = engine.recommend(&workload).unwrap();

    assert_eq!(recommendations.len(), 1);
    assert_eq!(index_fields(&recommendations[0]), vec!["a", "b"]);
}

/// Two disjoint queries: one index cannot serve both, selection picks one
/// per round and the second round re-credits nothing.
#[test]
fn test_disjoint_queries_get_separate_indexes() {
    let documents = (0..COLLECTION)
        .map(|i| {
            json!({
                "_id": i,
                "a": if i < 100 { 1 } else { i + 1000 },
                "b": if i >= 100 && i < 200 { 1 } else { i + 20_000 },
            })
        })
        .collect();
    let driver = engine_over(documents);
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let workload = vec![
        Query::from_mql(&json!({"a": 1})).unwrap(),
        Query::from_mql(&json!({"b": 1})).unwrap(),
    ];
    let recommendations = engine.recommend(&workload).unwrap();

    assert_eq!(recommendations.len(), 2);
    let mut fields: Vec<Vec<&str>> = recommendations.iter().map(index_fields).collect();
    fields.sort();
    assert_eq!(fields, vec![vec!["a"], vec!["b"]]);
}

// =============================================================================
// Invariants
// =============================================================================

/// Round-winning totals never increase.
#[test]
fn test_selection_benefits_non_increasing() {
    let documents = (0..COLLECTION)
        .map(|i| {
            json!({
                "_id": i,
                "a": i % 100,
                "b": i % 10,
                "c": i % 500,
            })
        })
        .collect();
    let driver = engine_over(documents);
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let workload = vec![
        Query::from_mql(&json!({"a": 17})).unwrap(),
        Query::from_mql(&json!({"b": 3})).unwrap(),
        Query::from_mql(&json!({"c": 42, "a": 17})).unwrap(),
    ];
    let recommendations = engine.recommend(&workload).unwrap();

    assert!(!recommendations.is_empty());
    for pair in recommendations.windows(2) {
        assert!(pair[0].benefit >= pair[1].benefit);
    }
}

/// The cap bounds the recommendation count.
#[test]
fn test_max_indexes_cap_respected() {
    let documents = (0..COLLECTION)
        .map(|i| json!({"_id": i, "a": i % 100, "b": i % 10, "c": i % 500}))
        .collect();
    let driver = engine_over(documents);

    let config = EngineConfig {
        max_indexes: 1,
        ..exact_config()
    };
    let engine = Engine::new(&driver, source(), config).unwrap();

    let workload = vec![
        Query::from_mql(&json!({"a": 17})).unwrap(),
        Query::from_mql(&json!({"b": 3})).unwrap(),
    ];
    let recommendations = engine.recommend(&workload).unwrap();

    assert_eq!(recommendations.len(), 1);
}

/// The same inputs always produce the same recommendations.
#[test]
fn test_recommendations_reproducible() {
    let driver = engine_over(selective_fixture());
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let workload = vec![
        Query::from_mql(&json!({"a": 1, "b": 5})).unwrap(),
        Query::from_mql(&json!({"b": {"$in": [1, 2, 3]}})).unwrap(),
    ];

    let first = engine.recommend(&workload).unwrap();
    let second = engine.recommend(&workload).unwrap();
    assert_eq!(first, second);
}

/// An index whose leading field the query does not filter on is never
/// recommended on the strength of that query alone.
#[test]
fn test_unusable_leading_field_scores_zero() {
    let driver = engine_over(selective_fixture());

    // Workload filters only on a; candidates on b alone exist via the sort
    let config = EngineConfig {
        max_index_fields: 1,
        ..exact_config()
    };
    let engine = Engine::new(&driver, source(), config).unwrap();

    let workload = vec![Query::from_mql(&json!({"a": 1}))
        .unwrap()
        .with_sort(vec!["b".into()])];
    let recommendations = engine.recommend(&workload).unwrap();

    // (b) alone scores zero despite matching the sort; only (a) is selected
    assert_eq!(recommendations.len(), 1);
    assert_eq!(index_fields(&recommendations[0]), vec!["a"]);
}

/// The sample collection is gone once recommendations are returned.
#[test]
fn test_sample_cleaned_up() {
    let driver = engine_over(selective_fixture());
    let engine = Engine::new(&driver, source(), exact_config()).unwrap();

    let workload = vec![Query::from_mql(&json!({"a": 1})).unwrap()];
    engine.recommend(&workload).unwrap();

    let sample_ns = Namespace::new("mindexer_samples", "vehicles_registrations");
    assert_eq!(driver.count(&sample_ns).unwrap(), 0);
}
