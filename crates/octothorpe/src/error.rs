// File: octothorpe/src/error.rs
// Purpose: Error types for declaration, registration, and value resolution

use thiserror::Error;

/// Errors raised by declaration parsing, type registration, and value
/// resolution.
///
/// All variants are raised synchronously to the immediate caller; the codec
/// never retries or recovers internally. Note that unrecognized parameter
/// names in [`HashState::set_hash`](crate::HashState::set_hash),
/// [`HashState::with`](crate::HashState::with) and
/// [`HashState::without`](crate::HashState::without) are deliberate no-ops
/// for forward compatibility, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// A declaration entry was malformed (e.g. an empty parameter name).
    #[error("invalid parameter declaration: {detail}")]
    InvalidDeclaration { detail: String },

    /// A declaration referenced a type tag that is not in the registry.
    #[error("unknown parameter type: {tag:?}")]
    UnknownType { tag: String },

    /// A type descriptor was registered with a required field missing.
    #[error("type descriptor is missing required field {field:?}")]
    Configuration { field: &'static str },

    /// A type's merge policy received a value shape it cannot merge.
    #[error("type {tag:?} cannot merge value: {value}")]
    TypeMismatch { tag: String, value: String },
}
