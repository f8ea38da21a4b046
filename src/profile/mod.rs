//! Workload ingestion from profile logs
//!
//! Converts `system.profile`-shaped entries into the engine's workload.
//! Only read operations against the source namespace are considered.
//! Entries whose filters use unsupported operators are logged and skipped;
//! ingestion itself never fails.

use serde_json::Value;

use crate::driver::Namespace;
use crate::observability::Logger;
use crate::query::{Query, QueryResult};

/// Extracts the workload from profile entries, preserving their order
pub fn workload_from_profile(entries: &[Value], source: &Namespace) -> Vec<Query> {
    let namespace = source.to_string();
    let mut workload = Vec::new();

    for entry in entries {
        if entry.get("op").and_then(Value::as_str) != Some("query") {
            continue;
        }
        if entry.get("ns").and_then(Value::as_str) != Some(namespace.as_str()) {
            continue;
        }
        let Some(command) = entry.get("command") else {
            continue;
        };

        match query_from_find_command(command) {
            Ok(query) => workload.push(query),
            Err(error) => {
                let reason = error.to_string();
                Logger::warn(
                    "unsupported_query",
                    &[
                        ("namespace", namespace.as_str()),
                        ("reason", reason.as_str()),
                    ],
                );
            }
        }
    }

    workload
}

/// Builds a query from the body of a find command.
///
/// Sort directions are discarded, only the field sequence is kept. The
/// projection keeps include-projection fields; exclusions, notably
/// `{"_id": 0}`, are dropped.
pub fn query_from_find_command(command: &Value) -> QueryResult<Query> {
    let mut query = match command.get("filter") {
        Some(filter) => Query::from_mql(filter)?,
        None => Query::from_mql(&Value::Object(serde_json::Map::new()))?,
    };

    if let Some(sort) = command.get("sort").and_then(Value::as_object) {
        query = query.with_sort(sort.keys().cloned().collect());
    }

    if let Some(limit) = command.get("limit").and_then(Value::as_u64) {
        if limit > 0 {
            query = query.with_limit(limit);
        }
    }

    if let Some(projection) = command.get("projection").and_then(Value::as_object) {
        let include: Vec<String> = projection
            .iter()
            .filter(|(_, value)| is_include(value))
            .map(|(field, _)| field.clone())
            .collect();
        if !include.is_empty() {
            query = query.with_projection(include);
        }
    }

    Ok(query)
}

fn is_include(value: &Value) -> bool {
    match value {
        Value::Bool(included) => *included,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> Namespace {
        Namespace::new("vehicles", "registrations")
    }

    fn entry(command: Value) -> Value {
        json!({
            "op": "query",
            "ns": "vehicles.registrations",
            "command": command,
        })
    }

    #[test]
    fn test_basic_find_command() {
        let entries = vec![entry(json!({
            "find": "registrations",
            "filter": {"make": "HYUND", "year": {"$gte": 2015}},
            "sort": {"year": -1},
            "limit": 50,
            "projection": {"make": 1, "year": 1, "_id": 0},
        }))];

        let workload = workload_from_profile(&entries, &source());
        assert_eq!(workload.len(), 1);

        let query = &workload[0];
        assert_eq!(query.fields(), vec!["make", "year"]);
        assert_eq!(query.sort(), &["year".to_string()]);
        assert_eq!(query.limit(), Some(50));
        assert_eq!(query.projection(), &["make".to_string(), "year".to_string()]);
    }

    #[test]
    fn test_other_namespaces_and_ops_skipped() {
        let entries = vec![
            json!({"op": "insert", "ns": "vehicles.registrations", "command": {}}),
            json!({"op": "query", "ns": "vehicles.other", "command": {"filter": {"a": 1}}}),
            entry(json!({"filter": {"a": 1}})),
        ];

        let workload = workload_from_profile(&entries, &source());
        assert_eq!(workload.len(), 1);
    }

    #[test]
    fn test_unsupported_operator_skipped_not_fatal() {
        let entries = vec![
            entry(json!({"filter": {"name": {"$regex": "^A"}}})),
            entry(json!({"filter": {"make": "HYUND"}})),
        ];

        let workload = workload_from_profile(&entries, &source());
        assert_eq!(workload.len(), 1);
        assert_eq!(workload[0].fields(), vec!["make"]);
    }

    #[test]
    fn test_exclude_projection_dropped() {
        let query = query_from_find_command(&json!({
            "filter": {"a": 1},
            "projection": {"_id": 0},
        }))
        .unwrap();

        assert!(query.projection().is_empty());
    }

    #[test]
    fn test_missing_filter_yields_empty_filter() {
        let query = query_from_find_command(&json!({"find": "registrations"})).unwrap();
        assert!(query.filter().is_empty());
    }

    #[test]
    fn test_zero_limit_ignored() {
        let query = query_from_find_command(&json!({
            "filter": {"a": 1},
            "limit": 0,
        }))
        .unwrap();

        assert_eq!(query.limit(), None);
    }

    #[test]
    fn test_order_preserved() {
        let entries = vec![
            entry(json!({"filter": {"b": 1}})),
            entry(json!({"filter": {"a": 1}})),
        ];

        let workload = workload_from_profile(&entries, &source());
        assert_eq!(workload[0].fields(), vec!["b"]);
        assert_eq!(workload[1].fields(), vec!["a"]);
    }
}
