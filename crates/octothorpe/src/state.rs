// File: octothorpe/src/state.rs
// Purpose: The parameter set, fragment parsing/generation, and pure updates

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::encode::{decode_component, encode_component};
use crate::error::ParamError;
use crate::types::{self, ParamType};
use crate::value::{Update, Value};

/// Characters reserved in encoded parameter names on top of the base-safe
/// set: `=` separates the name from the value within a segment.
const NAME_RESERVED: &[char] = &['='];

// ============================================================================
// Parameter Declarations
// ============================================================================

/// One declared parameter: a name bound to a registered type.
#[derive(Clone)]
pub struct Param {
    name: String,
    ty: Arc<dyn ParamType>,
}

impl Param {
    /// Binds `name` to the registered type `tag`.
    pub fn new(name: impl Into<String>, tag: &str) -> Result<Self, ParamError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ParamError::InvalidDeclaration {
                detail: "empty parameter name".to_string(),
            });
        }
        if name.contains(':') {
            return Err(ParamError::InvalidDeclaration {
                detail: format!("parameter name {:?} contains ':'", name),
            });
        }
        let ty = types::lookup_type(tag).ok_or_else(|| ParamError::UnknownType {
            tag: tag.to_string(),
        })?;
        Ok(Self { name, ty })
    }

    /// Parses a `name` or `name:type` declaration string. A bare name
    /// defaults to the `scalar` type.
    pub fn parse(declaration: &str) -> Result<Self, ParamError> {
        let (name, tag) = match declaration.split_once(':') {
            Some((name, tag)) => (name, tag),
            None => (declaration, "scalar"),
        };
        if name.is_empty() {
            return Err(ParamError::InvalidDeclaration {
                detail: format!("empty name in declaration {:?}", declaration),
            });
        }
        Param::new(name, tag)
    }

    /// The parameter's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag of the parameter's type.
    pub fn type_tag(&self) -> &str {
        self.ty.tag()
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("type", &self.ty.tag())
            .finish()
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty.tag() == other.ty.tag()
    }
}

/// A declaration entry accepted by [`HashState::new`]: either a declaration
/// string to parse, or an already-built [`Param`] passed through unchanged
/// (which is how derived instances share their declarations).
pub enum Declaration {
    /// A `name` or `name:type` string.
    Parse(String),
    /// A pre-built parameter, taken as-is.
    Param(Param),
}

impl From<&str> for Declaration {
    fn from(s: &str) -> Self {
        Declaration::Parse(s.to_string())
    }
}

impl From<String> for Declaration {
    fn from(s: String) -> Self {
        Declaration::Parse(s)
    }
}

impl From<Param> for Declaration {
    fn from(param: Param) -> Self {
        Declaration::Param(param)
    }
}

// ============================================================================
// HashState
// ============================================================================

/// A set of declared parameters plus their current values, convertible to
/// and from a `#name=value;name=value` fragment string.
///
/// The value mapping always holds exactly one entry per declared parameter;
/// parameters absent from a parsed hash sit at their type's empty value.
/// [`set_hash`](HashState::set_hash) is the one mutating operation;
/// [`with`](HashState::with) and [`without`](HashState::without) return new
/// instances and never touch the receiver.
pub struct HashState {
    params: Vec<Param>,
    values: HashMap<String, Value>,
}

impl HashState {
    /// Builds a state from declarations, with every value at its type's
    /// empty value (equivalent to parsing an empty hash).
    ///
    /// ```
    /// use octothorpe::HashState;
    ///
    /// let state = HashState::new(["q", "tags:set"]).unwrap();
    /// assert_eq!(state.get_hash(), "#");
    /// ```
    pub fn new<I>(declarations: I) -> Result<Self, ParamError>
    where
        I: IntoIterator,
        I::Item: Into<Declaration>,
    {
        let mut params = Vec::new();
        for (index, declaration) in declarations.into_iter().enumerate() {
            let param = match declaration.into() {
                Declaration::Parse(text) => Param::parse(&text).map_err(|err| match err {
                    ParamError::InvalidDeclaration { detail } => ParamError::InvalidDeclaration {
                        detail: format!("at index {}: {}", index, detail),
                    },
                    other => other,
                })?,
                Declaration::Param(param) => param,
            };
            params.push(param);
        }
        let mut state = Self {
            params,
            values: HashMap::new(),
        };
        state.set_hash("");
        Ok(state)
    }

    /// The declared parameters, in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The current value of a declared parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The current value of a scalar-carrier parameter.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_scalar()
    }

    /// The current members of a set-carrier parameter.
    pub fn set(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.get(name)?.as_set()
    }

    /// Replaces the entire value mapping from a fragment string.
    ///
    /// A single leading `#` is stripped; segments are split on `;` (empty
    /// segments are tolerated) and each is split at the first `=`. A segment
    /// with no `=` is treated as a bare name with an empty value, which for
    /// a declared name resets it to empty (a deliberate forward-compat
    /// default). Unrecognized names are ignored, and every declared parameter
    /// the hash does not mention is reset to its type's empty value: this is
    /// a full replacement, never a merge with prior values.
    pub fn set_hash(&mut self, hash: &str) {
        let payload = hash.strip_prefix('#').unwrap_or(hash);
        let mut values: HashMap<String, Value> = self
            .params
            .iter()
            .map(|param| (param.name.clone(), param.ty.empty_value()))
            .collect();
        for segment in payload.split(';') {
            if segment.is_empty() {
                continue;
            }
            let (raw_name, raw_value) = segment.split_once('=').unwrap_or((segment, ""));
            let name = decode_component(raw_name);
            match self.find(&name) {
                Some(param) => {
                    values.insert(name, param.ty.decode(raw_value));
                }
                None => {
                    tracing::debug!(name = %name, "ignoring unknown fragment parameter");
                }
            }
        }
        self.values = values;
    }

    /// Generates the canonical fragment string for the current values.
    ///
    /// Parameters are emitted in declaration order; semantically empty
    /// values are omitted entirely. With nothing to emit the result is the
    /// bare `"#"`.
    pub fn get_hash(&self) -> String {
        let segments: Vec<String> = self
            .params
            .iter()
            .filter_map(|param| {
                let encoded = param.ty.encode(self.values.get(&param.name)?);
                if encoded.is_empty() {
                    return None;
                }
                Some(format!(
                    "{}={}",
                    encode_component(&param.name, NAME_RESERVED),
                    encoded
                ))
            })
            .collect();
        format!("#{}", segments.join(";"))
    }

    /// Returns a new state where `name` holds the result of its type's
    /// merge policy applied to the (cloned) current value and `update`.
    ///
    /// The receiver is never mutated. An undeclared `name` yields an
    /// unchanged copy rather than an error.
    pub fn with(&self, name: &str, update: impl Into<Update>) -> Result<Self, ParamError> {
        let param = self.find(name).cloned();
        let mut next = self.derive();
        match param {
            Some(param) => {
                let old = next
                    .values
                    .remove(&param.name)
                    .unwrap_or_else(|| param.ty.empty_value());
                let resolved = param.ty.resolve_with(old, update.into())?;
                next.values.insert(param.name.clone(), resolved);
            }
            None => {
                tracing::debug!(name, "with() on an undeclared parameter is a no-op");
            }
        }
        Ok(next)
    }

    /// Returns a new state where `name` holds the result of its type's
    /// removal policy; `token` selects what to remove (one set member) and
    /// `None` requests a full reset. Same no-op policy for undeclared names
    /// as [`with`](HashState::with).
    pub fn without(&self, name: &str, token: Option<&str>) -> Self {
        let param = self.find(name).cloned();
        let mut next = self.derive();
        match param {
            Some(param) => {
                let old = next
                    .values
                    .remove(&param.name)
                    .unwrap_or_else(|| param.ty.empty_value());
                let resolved = param.ty.resolve_without(old, token);
                next.values.insert(param.name.clone(), resolved);
            }
            None => {
                tracing::debug!(name, "without() on an undeclared parameter is a no-op");
            }
        }
        next
    }

    fn find(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    /// New instance sharing the declarations, with every value cloned
    /// through its type's `clone_value` so no mutable substructure is ever
    /// shared between instances.
    fn derive(&self) -> Self {
        let values = self
            .params
            .iter()
            .filter_map(|param| {
                let value = self.values.get(&param.name)?;
                Some((param.name.clone(), param.ty.clone_value(value)))
            })
            .collect();
        Self {
            params: self.params.clone(),
            values,
        }
    }
}

impl Clone for HashState {
    fn clone(&self) -> Self {
        self.derive()
    }
}

impl fmt::Debug for HashState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashState")
            .field("params", &self.params)
            .field("values", &self.values)
            .finish()
    }
}

impl fmt::Display for HashState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_hash())
    }
}
