// File: octothorpe/src/types/set.rs
// Purpose: Built-in "set" parameter type (unique member strings)

use std::collections::BTreeSet;

use crate::encode::{decode_component, encode_component};
use crate::error::ParamError;
use crate::value::{Update, Value};

use super::ParamType;

pub(crate) const TAG: &str = "set";

/// A set of unique member strings, encoded as `,`-joined members.
///
/// `with` is additive when given a single member and replaces wholesale when
/// given a set; `without` removes one member, or resets the set when no
/// member token is given. Members are emitted in case-insensitive lexical
/// order so identical sets always serialize identically, regardless of how
/// they were built up.
pub struct SetType;

impl ParamType for SetType {
    fn tag(&self) -> &str {
        TAG
    }

    fn extra_reserved(&self) -> &[char] {
        // `,` is this type's member separator; a literal `,` inside a member
        // must be escaped to survive the round trip.
        &[',', '=']
    }

    fn empty_value(&self) -> Value {
        Value::empty_set()
    }

    fn decode(&self, raw: &str) -> Value {
        let mut members = BTreeSet::new();
        for piece in raw.split(',') {
            if piece.is_empty() {
                continue;
            }
            let member = decode_component(piece);
            if !member.is_empty() {
                members.insert(member);
            }
        }
        Value::Set(members)
    }

    fn encode(&self, value: &Value) -> String {
        let members = match value {
            Value::Set(members) if !members.is_empty() => members,
            _ => return String::new(),
        };
        let mut ordered: Vec<&String> = members.iter().collect();
        ordered.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        ordered
            .iter()
            .map(|member| encode_component(member, self.extra_reserved()))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn resolve_with(&self, old: Value, update: Update) -> Result<Value, ParamError> {
        match update {
            Update::None => Ok(old),
            Update::Value(Value::Scalar(member)) if member.is_empty() => Ok(old),
            Update::Value(Value::Scalar(member)) => {
                let mut members = match old {
                    Value::Set(members) => members,
                    Value::Scalar(_) => BTreeSet::new(),
                };
                members.insert(member);
                Ok(Value::Set(members))
            }
            Update::Value(Value::Set(members)) => Ok(Value::Set(members)),
        }
    }

    fn resolve_without(&self, old: Value, token: Option<&str>) -> Value {
        match token {
            Some(member) => {
                let mut members = match old {
                    Value::Set(members) => members,
                    Value::Scalar(_) => BTreeSet::new(),
                };
                members.remove(member);
                Value::Set(members)
            }
            None => Value::empty_set(),
        }
    }
}
