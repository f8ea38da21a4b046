//! Filter construction from MQL documents
//!
//! Recognized operators: implicit equality, `$eq`, `$in`, `$gt`, `$gte`,
//! `$lt`, `$lte`, and implicit conjunction via multi-key operator documents.
//! Anything else fails construction.

use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::filter::Filter;
use super::predicate::{Predicate, RangeBounds};

pub(super) fn parse_filter(filter: &Value) -> QueryResult<Filter> {
    let document = filter
        .as_object()
        .ok_or_else(|| QueryError::FilterNotDocument(value_type(filter)))?;

    let mut parsed = Filter::new();
    for (field, rhs) in document {
        if field.starts_with('$') {
            return Err(QueryError::TopLevelOperator(field.clone()));
        }
        parsed.push(field.clone(), parse_predicate(field, rhs)?);
    }
    Ok(parsed)
}

fn parse_predicate(field: &str, rhs: &Value) -> QueryResult<Predicate> {
    let Some(document) = rhs.as_object() else {
        // Scalars and arrays are exact-match equality
        return Ok(Predicate::Equality(rhs.clone()));
    };

    let has_operators = document.keys().any(|key| key.starts_with('$'));
    if !has_operators {
        // An operator-free document matches an embedded document verbatim
        return Ok(Predicate::Equality(rhs.clone()));
    }
    if !document.keys().all(|key| key.starts_with('$')) {
        return Err(QueryError::MixedPredicate(field.to_string()));
    }

    let mut members: Vec<Predicate> = Vec::new();
    let mut bounds = RangeBounds::unbounded();

    for (op, value) in document {
        match op.as_str() {
            "$eq" => members.push(Predicate::Equality(value.clone())),
            "$in" => {
                let values = value
                    .as_array()
                    .filter(|values| !values.is_empty())
                    .ok_or_else(|| QueryError::MalformedIn(field.to_string()))?;
                members.push(Predicate::In(values.clone()));
            }
            "$gt" | "$gte" => {
                if bounds.lo.is_some() {
                    members.push(Predicate::Range(std::mem::replace(
                        &mut bounds,
                        RangeBounds::unbounded(),
                    )));
                }
                bounds.lo = Some(value.clone());
                bounds.lo_inclusive = op == "$gte";
            }
            "$lt" | "$lte" => {
                if bounds.hi.is_some() {
                    members.push(Predicate::Range(std::mem::replace(
                        &mut bounds,
                        RangeBounds::unbounded(),
                    )));
                }
                bounds.hi = Some(value.clone());
                bounds.hi_inclusive = op == "$lte";
            }
            _ => {
                return Err(QueryError::UnsupportedOperator {
                    field: field.to_string(),
                    op: op.clone(),
                })
            }
        }
    }

    if bounds.is_bounded() {
        members.push(Predicate::Range(bounds));
    }

    if members.len() == 1 {
        Ok(members.remove(0))
    } else {
        Ok(Predicate::Conjunction(members))
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_implicit_equality() {
        let filter = parse_filter(&json!({"make": "HYUND"})).unwrap();
        assert_eq!(filter.get("make"), Some(&Predicate::Equality(json!("HYUND"))));
    }

    #[test]
    fn test_explicit_eq() {
        let filter = parse_filter(&json!({"make": {"$eq": "HYUND"}})).unwrap();
        assert_eq!(filter.get("make"), Some(&Predicate::Equality(json!("HYUND"))));
    }

    #[test]
    fn test_in() {
        let filter = parse_filter(&json!({"make": {"$in": ["INFIN", "HYUND"]}})).unwrap();
        assert_eq!(
            filter.get("make"),
            Some(&Predicate::In(vec![json!("INFIN"), json!("HYUND")]))
        );
    }

    #[test]
    fn test_empty_in_rejected() {
        let err = parse_filter(&json!({"make": {"$in": []}})).unwrap_err();
        assert_eq!(err, QueryError::MalformedIn("make".into()));
    }

    #[test]
    fn test_range_bounds_merge() {
        let filter = parse_filter(&json!({"weight": {"$gt": 1000, "$lte": 3000}})).unwrap();
        let Some(Predicate::Range(bounds)) = filter.get("weight") else {
            panic!("expected a single range predicate");
        };
        assert_eq!(bounds.lo, Some(json!(1000)));
        assert!(!bounds.lo_inclusive);
        assert_eq!(bounds.hi, Some(json!(3000)));
        assert!(bounds.hi_inclusive);
    }

    #[test]
    fn test_equality_and_range_conjoin() {
        let filter = parse_filter(&json!({"weight": {"$eq": 2000, "$lt": 3000}})).unwrap();
        let Some(Predicate::Conjunction(members)) = filter.get("weight") else {
            panic!("expected a conjunction");
        };
        assert_eq!(members.len(), 2);
        assert!(members[0].is_equality());
    }

    #[test]
    fn test_embedded_document_equality() {
        let filter = parse_filter(&json!({"dims": {"w": 3, "h": 4}})).unwrap();
        assert!(filter.get("dims").is_some_and(Predicate::is_equality));
    }

    #[test]
    fn test_unsupported_operator() {
        let err = parse_filter(&json!({"name": {"$regex": "^A"}})).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnsupportedOperator {
                field: "name".into(),
                op: "$regex".into()
            }
        );
    }

    #[test]
    fn test_top_level_operator_rejected() {
        let err = parse_filter(&json!({"$or": [{"a": 1}, {"b": 1}]})).unwrap_err();
        assert_eq!(err, QueryError::TopLevelOperator("$or".into()));
    }

    #[test]
    fn test_mixed_predicate_rejected() {
        let err = parse_filter(&json!({"a": {"$gt": 1, "b": 2}})).unwrap_err();
        assert_eq!(err, QueryError::MixedPredicate("a".into()));
    }

    #[test]
    fn test_filter_must_be_document() {
        let err = parse_filter(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, QueryError::FilterNotDocument("array"));
    }

    #[test]
    fn test_field_order_preserved() {
        let filter = parse_filter(&json!({"b": 1, "a": 2, "c": 3})).unwrap();
        let fields: Vec<&str> = filter.fields().collect();
        assert_eq!(fields, vec!["b", "a", "c"]);
    }
}
