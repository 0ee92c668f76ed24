// File: octothorpe/src/types/scalar.rs
// Purpose: Built-in "scalar" parameter type (single optional string)

use crate::encode::{decode_component, encode_component};
use crate::error::ParamError;
use crate::value::{Update, Value};

use super::ParamType;

pub(crate) const TAG: &str = "scalar";

/// The default parameter type: one optional string, where the empty string
/// means "absent". `with` replaces the value wholesale; `without` clears it.
pub struct ScalarType;

impl ParamType for ScalarType {
    fn tag(&self) -> &str {
        TAG
    }

    fn extra_reserved(&self) -> &[char] {
        // `,` and `=` carry structural meaning elsewhere in the fragment
        // grammar, so literal occurrences inside a scalar are escaped.
        &[',', '=']
    }

    fn empty_value(&self) -> Value {
        Value::empty_scalar()
    }

    fn decode(&self, raw: &str) -> Value {
        Value::Scalar(decode_component(raw))
    }

    fn encode(&self, value: &Value) -> String {
        match value {
            Value::Scalar(s) => encode_component(s, self.extra_reserved()),
            Value::Set(_) => String::new(),
        }
    }

    fn resolve_with(&self, _old: Value, update: Update) -> Result<Value, ParamError> {
        match update {
            Update::None => Ok(Value::empty_scalar()),
            Update::Value(Value::Scalar(s)) => Ok(Value::Scalar(s)),
            other => Err(ParamError::TypeMismatch {
                tag: TAG.to_string(),
                value: other.describe(),
            }),
        }
    }

    fn resolve_without(&self, _old: Value, _token: Option<&str>) -> Value {
        Value::empty_scalar()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_percent_decodes() {
        assert_eq!(
            ScalarType.decode("hello%20world"),
            Value::Scalar("hello world".to_string())
        );
    }

    #[test]
    fn encode_escapes_structural_characters() {
        assert_eq!(
            ScalarType.encode(&Value::Scalar("a=b,c;d".to_string())),
            "a%3Db%2Cc%3Bd"
        );
        assert_eq!(ScalarType.encode(&Value::empty_scalar()), "");
    }

    #[test]
    fn with_replaces_and_none_clears() {
        let old = Value::Scalar("old".to_string());
        assert_eq!(
            ScalarType.resolve_with(old.clone(), Update::from("new")),
            Ok(Value::Scalar("new".to_string()))
        );
        assert_eq!(
            ScalarType.resolve_with(old, Update::None),
            Ok(Value::empty_scalar())
        );
    }

    #[test]
    fn with_rejects_a_set() {
        let result = ScalarType.resolve_with(Value::empty_scalar(), Update::from(["a"]));
        assert!(matches!(
            result,
            Err(ParamError::TypeMismatch { tag, .. }) if tag == "scalar"
        ));
    }

    #[test]
    fn without_always_clears() {
        let old = Value::Scalar("keep?".to_string());
        assert_eq!(
            ScalarType.resolve_without(old.clone(), Some("keep?")),
            Value::empty_scalar()
        );
        assert_eq!(ScalarType.resolve_without(old, None), Value::empty_scalar());
    }
}
