//! Predicate evaluation against documents
//!
//! Matches documents strictly: no type coercion, missing fields and null
//! values never match. Field paths may be dotted (`a.b.c`) and resolve
//! through nested documents.

use std::cmp::Ordering;

use serde_json::Value;

use super::filter::Filter;
use super::predicate::{Predicate, RangeBounds};

/// Evaluates filters against documents
pub struct DocumentMatcher;

impl DocumentMatcher {
    /// Checks if a document matches every predicate of the filter
    pub fn matches(document: &Value, filter: &Filter) -> bool {
        filter
            .iter()
            .all(|(field, predicate)| Self::matches_predicate(document, field, predicate))
    }

    /// Resolves a possibly dotted path through nested documents
    pub fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
        path.split('.')
            .try_fold(document, |value, segment| value.get(segment))
    }

    fn matches_predicate(document: &Value, field: &str, predicate: &Predicate) -> bool {
        // Missing fields and null values never match, Exists included
        let Some(value) = Self::lookup_path(document, field) else {
            return false;
        };
        if value.is_null() {
            return false;
        }

        match predicate {
            Predicate::Equality(expected) => value == expected,
            Predicate::In(values) => values.iter().any(|candidate| candidate == value),
            Predicate::Range(bounds) => Self::range_match(value, bounds),
            Predicate::Conjunction(members) => members
                .iter()
                .all(|member| Self::matches_predicate(document, field, member)),
            Predicate::Exists => true,
        }
    }

    fn range_match(value: &Value, bounds: &RangeBounds) -> bool {
        if let Some(lo) = &bounds.lo {
            match compare_values(value, lo) {
                Some(Ordering::Greater) => {}
                Some(Ordering::Equal) if bounds.lo_inclusive => {}
                _ => return false,
            }
        }

        if let Some(hi) = &bounds.hi {
            match compare_values(value, hi) {
                Some(Ordering::Less) => {}
                Some(Ordering::Equal) if bounds.hi_inclusive => {}
                _ => return false,
            }
        }

        true
    }
}

/// Compares two values of comparable type.
///
/// Numbers compare numerically (exact for integer pairs), strings
/// lexicographically, booleans false < true. Returns None for any other
/// pairing; range predicates treat that as a non-match.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                Some(xi.cmp(&yi))
            } else {
                x.as_f64()?.partial_cmp(&y.as_f64()?)
            }
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total ordering for sorting result sets.
///
/// Ordering rules: missing < null < bool < number < string < array < object;
/// within a type, natural ordering. Arrays and objects compare equal.
pub fn total_order(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let type_order = |v: &Value| -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::Number(_) => 2,
                    Value::String(_) => 3,
                    Value::Array(_) => 4,
                    Value::Object(_) => 5,
                }
            };

            let a_type = type_order(a_val);
            let b_type = type_order(b_val);

            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            compare_values(a_val, b_val).unwrap_or(Ordering::Equal)
        }
    }
}
