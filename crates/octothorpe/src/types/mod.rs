// File: octothorpe/src/types/mod.rs
// Purpose: Parameter type descriptors and the process-wide type registry

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::error::ParamError;
use crate::value::{Update, Value};

mod scalar;
mod set;

pub use scalar::ScalarType;
pub use set::SetType;

// ============================================================================
// Type Capability Interface
// ============================================================================

/// The capability interface of one parameter type.
///
/// A type bundles everything a [`HashState`](crate::HashState) needs to
/// handle parameters of that type: how an absent value looks, how raw
/// fragment payloads map to values and back, and the merge policies behind
/// `with` and `without`.
pub trait ParamType: Send + Sync {
    /// The tag under which this type is registered (e.g. `"scalar"`).
    fn tag(&self) -> &str;

    /// Characters this type additionally reserves inside its encoded values.
    ///
    /// The `set` type reserves `,` because it uses it as its member
    /// separator; a literal `,` inside a member must therefore be escaped.
    fn extra_reserved(&self) -> &[char] {
        &[]
    }

    /// The canonical "absent" value for this type.
    fn empty_value(&self) -> Value;

    /// Deep copy of a value. Mutating the copy must never affect the
    /// original; the default is sufficient for both built-in carriers.
    fn clone_value(&self, value: &Value) -> Value {
        value.clone()
    }

    /// Parses a raw fragment-segment payload (still percent-encoded at this
    /// level) into a typed value.
    fn decode(&self, raw: &str) -> Value;

    /// Inverse of [`decode`](ParamType::decode). Returns the empty string
    /// when the value is semantically empty, so the segment is omitted from
    /// generated hash strings.
    fn encode(&self, value: &Value) -> String;

    /// Merge policy when a caller requests a new value for a parameter of
    /// this type (replace for scalars, additive for sets).
    fn resolve_with(&self, old: Value, update: Update) -> Result<Value, ParamError>;

    /// Removal policy for a parameter of this type (clear the whole scalar,
    /// remove one member or reset for sets).
    fn resolve_without(&self, old: Value, token: Option<&str>) -> Value;
}

// ============================================================================
// Registry
// ============================================================================

static REGISTRY: Lazy<RwLock<HashMap<String, Arc<dyn ParamType>>>> = Lazy::new(|| {
    let mut builtins: HashMap<String, Arc<dyn ParamType>> = HashMap::new();
    builtins.insert(scalar::TAG.to_string(), Arc::new(ScalarType));
    builtins.insert(set::TAG.to_string(), Arc::new(SetType));
    RwLock::new(builtins)
});

/// Registers a parameter type, inserting or overwriting the entry for its
/// tag. There is no removal operation.
///
/// The registry is meant to be populated once at startup, before any
/// [`HashState`](crate::HashState) is constructed; registering types while
/// states are actively decoding is unsupported.
pub fn register_type(ty: Arc<dyn ParamType>) {
    let tag = ty.tag().to_string();
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(tag, ty);
}

/// Looks up a registered type by tag.
pub fn lookup_type(tag: &str) -> Option<Arc<dyn ParamType>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(tag)
        .cloned()
}

// ============================================================================
// Closure-based Type Descriptors
// ============================================================================

type EmptyFn = Box<dyn Fn() -> Value + Send + Sync>;
type CloneFn = Box<dyn Fn(&Value) -> Value + Send + Sync>;
type DecodeFn = Box<dyn Fn(&str) -> Value + Send + Sync>;
type EncodeFn = Box<dyn Fn(&Value) -> String + Send + Sync>;
type ResolveWithFn = Box<dyn Fn(Value, Update) -> Result<Value, ParamError> + Send + Sync>;
type ResolveWithoutFn = Box<dyn Fn(Value, Option<&str>) -> Value + Send + Sync>;

/// Builder for registering a parameter type from plain functions, without
/// writing a [`ParamType`] impl.
///
/// Every field except `clone_value` and `extra_reserved` is required;
/// [`register`](TypeDescriptor::register) fails with
/// [`ParamError::Configuration`] naming the first missing one.
///
/// ```
/// use octothorpe::{types::TypeDescriptor, Update, Value};
///
/// TypeDescriptor::new("upper")
///     .empty_value(|| Value::Scalar(String::new()))
///     .decode(|raw| Value::Scalar(octothorpe::encode::decode_component(raw).to_uppercase()))
///     .encode(|value| match value {
///         Value::Scalar(s) => octothorpe::encode::encode_component(s, &[',', '=']),
///         _ => String::new(),
///     })
///     .resolve_with(|_, update| match update {
///         Update::Value(v) => Ok(v),
///         Update::None => Ok(Value::Scalar(String::new())),
///     })
///     .resolve_without(|_, _| Value::Scalar(String::new()))
///     .register()
///     .unwrap();
/// ```
pub struct TypeDescriptor {
    tag: String,
    extra_reserved: Vec<char>,
    empty_value: Option<EmptyFn>,
    clone_value: Option<CloneFn>,
    decode: Option<DecodeFn>,
    encode: Option<EncodeFn>,
    resolve_with: Option<ResolveWithFn>,
    resolve_without: Option<ResolveWithoutFn>,
}

impl TypeDescriptor {
    /// Starts a descriptor for the given type tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            extra_reserved: Vec::new(),
            empty_value: None,
            clone_value: None,
            decode: None,
            encode: None,
            resolve_with: None,
            resolve_without: None,
        }
    }

    /// Characters this type additionally reserves inside encoded values.
    pub fn extra_reserved(mut self, chars: &[char]) -> Self {
        self.extra_reserved = chars.to_vec();
        self
    }

    /// Constructor for the type's "absent" value.
    pub fn empty_value(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.empty_value = Some(Box::new(f));
        self
    }

    /// Deep-copy function; defaults to the carrier's `Clone`.
    pub fn clone_value(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.clone_value = Some(Box::new(f));
        self
    }

    /// Raw payload to value.
    pub fn decode(mut self, f: impl Fn(&str) -> Value + Send + Sync + 'static) -> Self {
        self.decode = Some(Box::new(f));
        self
    }

    /// Value to raw payload; must return `""` for semantically empty values.
    pub fn encode(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.encode = Some(Box::new(f));
        self
    }

    /// Merge policy behind [`HashState::with`](crate::HashState::with).
    pub fn resolve_with(
        mut self,
        f: impl Fn(Value, Update) -> Result<Value, ParamError> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_with = Some(Box::new(f));
        self
    }

    /// Removal policy behind [`HashState::without`](crate::HashState::without).
    pub fn resolve_without(
        mut self,
        f: impl Fn(Value, Option<&str>) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.resolve_without = Some(Box::new(f));
        self
    }

    /// Validates the descriptor and inserts it into the registry.
    pub fn register(self) -> Result<(), ParamError> {
        if self.tag.is_empty() {
            return Err(ParamError::Configuration { field: "tag" });
        }
        let empty_value = self
            .empty_value
            .ok_or(ParamError::Configuration { field: "empty_value" })?;
        let decode = self
            .decode
            .ok_or(ParamError::Configuration { field: "decode" })?;
        let encode = self
            .encode
            .ok_or(ParamError::Configuration { field: "encode" })?;
        let resolve_with = self
            .resolve_with
            .ok_or(ParamError::Configuration { field: "resolve_with" })?;
        let resolve_without = self
            .resolve_without
            .ok_or(ParamError::Configuration { field: "resolve_without" })?;

        register_type(Arc::new(DescriptorType {
            tag: self.tag,
            extra_reserved: self.extra_reserved,
            empty_value,
            clone_value: self.clone_value,
            decode,
            encode,
            resolve_with,
            resolve_without,
        }));
        Ok(())
    }
}

/// A registered type backed by descriptor closures.
struct DescriptorType {
    tag: String,
    extra_reserved: Vec<char>,
    empty_value: EmptyFn,
    clone_value: Option<CloneFn>,
    decode: DecodeFn,
    encode: EncodeFn,
    resolve_with: ResolveWithFn,
    resolve_without: ResolveWithoutFn,
}

impl ParamType for DescriptorType {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn extra_reserved(&self) -> &[char] {
        &self.extra_reserved
    }

    fn empty_value(&self) -> Value {
        (self.empty_value)()
    }

    fn clone_value(&self, value: &Value) -> Value {
        match &self.clone_value {
            Some(f) => f(value),
            None => value.clone(),
        }
    }

    fn decode(&self, raw: &str) -> Value {
        (self.decode)(raw)
    }

    fn encode(&self, value: &Value) -> String {
        (self.encode)(value)
    }

    fn resolve_with(&self, old: Value, update: Update) -> Result<Value, ParamError> {
        (self.resolve_with)(old, update)
    }

    fn resolve_without(&self, old: Value, token: Option<&str>) -> Value {
        (self.resolve_without)(old, token)
    }
}
