// File: octothorpe/src/value.rs
// Purpose: Typed parameter values and the update argument for `with`

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A decoded parameter value.
///
/// The two carriers cover the built-in `scalar` and `set` types; registered
/// custom types pick whichever carrier fits and supply their own codec and
/// merge policy around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A single optional string; the empty string means "absent".
    Scalar(String),
    /// An unordered set of unique member strings.
    Set(BTreeSet<String>),
}

impl Value {
    /// An empty scalar.
    pub fn empty_scalar() -> Self {
        Value::Scalar(String::new())
    }

    /// An empty set.
    pub fn empty_set() -> Self {
        Value::Set(BTreeSet::new())
    }

    /// Whether this value is semantically absent.
    ///
    /// Empty values are omitted entirely from generated hash strings.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_empty(),
            Value::Set(members) => members.is_empty(),
        }
    }

    /// The scalar payload, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Set(_) => None,
        }
    }

    /// The member set, if this is a set.
    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Value::Scalar(_) => None,
            Value::Set(members) => Some(members),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<BTreeSet<String>> for Value {
    fn from(members: BTreeSet<String>) -> Self {
        Value::Set(members)
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(members: [&str; N]) -> Self {
        Value::Set(members.iter().map(|m| m.to_string()).collect())
    }
}

/// The argument to [`HashState::with`](crate::HashState::with).
///
/// `Update::None` asks the parameter's type for its "no new value" behavior
/// (scalars clear, sets stay unchanged). Everything convertible into a
/// [`Value`] converts into an `Update`, so call sites read as
/// `state.with("q", "hello")` or `state.with("tags", ["a", "b"])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// No replacement value supplied.
    None,
    /// A replacement or merge value.
    Value(Value),
}

impl Update {
    /// Short human description of the update shape, used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Update::None => "none".to_string(),
            Update::Value(Value::Scalar(s)) => format!("scalar {:?}", s),
            Update::Value(Value::Set(members)) => format!("set of {} members", members.len()),
        }
    }
}

impl<V: Into<Value>> From<V> for Update {
    fn from(value: V) -> Self {
        Update::Value(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness_per_carrier() {
        assert!(Value::empty_scalar().is_empty());
        assert!(Value::empty_set().is_empty());
        assert!(!Value::from("x").is_empty());
        assert!(!Value::from(["x"]).is_empty());
    }

    #[test]
    fn conversions_pick_the_right_carrier() {
        assert_eq!(Value::from("a"), Value::Scalar("a".to_string()));
        let v = Value::from(["b", "a", "b"]);
        let members = v.as_set().map(|s| s.len());
        assert_eq!(members, Some(2));
    }

    #[test]
    fn update_from_value_shapes() {
        assert_eq!(
            Update::from("a"),
            Update::Value(Value::Scalar("a".to_string()))
        );
        assert!(matches!(Update::from(["a"]), Update::Value(Value::Set(_))));
    }
}
