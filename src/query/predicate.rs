//! Single-field predicates
//!
//! The tagged sum every filter reduces to. Values are JSON scalars compared
//! by the database's ordering; see the matcher for comparison rules.

use serde_json::Value;

/// Bounds of a range predicate. At least one bound is present.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBounds {
    pub lo: Option<Value>,
    pub hi: Option<Value>,
    pub lo_inclusive: bool,
    pub hi_inclusive: bool,
}

impl RangeBounds {
    /// A range with neither bound set; callers must add at least one.
    pub fn unbounded() -> Self {
        Self {
            lo: None,
            hi: None,
            lo_inclusive: false,
            hi_inclusive: false,
        }
    }

    /// Lower-bounded range
    pub fn lower(value: Value, inclusive: bool) -> Self {
        Self {
            lo: Some(value),
            hi: None,
            lo_inclusive: inclusive,
            hi_inclusive: false,
        }
    }

    /// Upper-bounded range
    pub fn upper(value: Value, inclusive: bool) -> Self {
        Self {
            lo: None,
            hi: Some(value),
            lo_inclusive: false,
            hi_inclusive: inclusive,
        }
    }

    /// True if at least one bound is set
    pub fn is_bounded(&self) -> bool {
        self.lo.is_some() || self.hi.is_some()
    }
}

/// A predicate on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// field = value
    Equality(Value),
    /// field takes one of the listed values; the list is non-empty
    In(Vec<Value>),
    /// field lies within the bounds
    Range(RangeBounds),
    /// Several of the above on the same field, e.g. x > 3 AND x < 10
    Conjunction(Vec<Predicate>),
    /// field is present with any value.
    ///
    /// Never parsed from a filter document; produced only by widening the
    /// last field of a key-count query.
    Exists,
}

impl Predicate {
    /// Returns true for a plain equality predicate
    pub fn is_equality(&self) -> bool {
        matches!(self, Predicate::Equality(_))
    }

    /// True for predicates that select more than a single index key
    pub fn is_multi_key(&self) -> bool {
        matches!(
            self,
            Predicate::In(_) | Predicate::Range(_) | Predicate::Conjunction(_)
        )
    }

    /// The widened form used on the last field of a key-count query:
    /// multi-key predicates become Exists, everything else is kept.
    pub fn widened(&self) -> Predicate {
        if self.is_multi_key() {
            Predicate::Exists
        } else {
            self.clone()
        }
    }

    /// Appends a stable textual rendering, used for estimate cache keys.
    pub(crate) fn cache_fragment(&self, out: &mut String) {
        match self {
            Predicate::Equality(value) => {
                out.push_str("eq(");
                out.push_str(&value.to_string());
                out.push(')');
            }
            Predicate::In(values) => {
                out.push_str("in(");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&value.to_string());
                }
                out.push(')');
            }
            Predicate::Range(bounds) => {
                out.push_str("range(");
                if let Some(lo) = &bounds.lo {
                    out.push_str(if bounds.lo_inclusive { "gte:" } else { "gt:" });
                    out.push_str(&lo.to_string());
                }
                out.push(';');
                if let Some(hi) = &bounds.hi {
                    out.push_str(if bounds.hi_inclusive { "lte:" } else { "lt:" });
                    out.push_str(&hi.to_string());
                }
                out.push(')');
            }
            Predicate::Conjunction(members) => {
                out.push_str("and(");
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    member.cache_fragment(out);
                }
                out.push(')');
            }
            Predicate::Exists => out.push_str("exists"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_widened_keeps_equality() {
        let eq = Predicate::Equality(json!(5));
        assert_eq!(eq.widened(), eq);
    }

    #[test]
    fn test_widened_collapses_multi_key() {
        let range = Predicate::Range(RangeBounds::lower(json!(3), false));
        assert_eq!(range.widened(), Predicate::Exists);

        let set = Predicate::In(vec![json!(1), json!(2)]);
        assert_eq!(set.widened(), Predicate::Exists);

        let and = Predicate::Conjunction(vec![
            Predicate::Range(RangeBounds::lower(json!(3), false)),
            Predicate::Range(RangeBounds::upper(json!(10), false)),
        ]);
        assert_eq!(and.widened(), Predicate::Exists);
    }

    #[test]
    fn test_cache_fragment_distinguishes_bounds() {
        let mut gt = String::new();
        Predicate::Range(RangeBounds::lower(json!(3), false)).cache_fragment(&mut gt);

        let mut gte = String::new();
        Predicate::Range(RangeBounds::lower(json!(3), true)).cache_fragment(&mut gte);

        assert_ne!(gt, gte);
    }
}
