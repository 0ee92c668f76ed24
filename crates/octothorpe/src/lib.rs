//! # Octothorpe
//!
//! A typed URL-fragment state codec: named parameters go to and from a
//! `#name=value;name=value` hash string, with support for:
//! - Scalar parameters (`"q"`) and string-set parameters (`"tags:set"`)
//! - An extensible, process-wide type registry for custom parameter types
//! - Pure `with`/`without` updates that return modified copies
//! - Canonical output (deterministic member ordering, empty values omitted)
//! - Forward compatibility (unknown names in a hash are ignored)
//!
//! ## Fragment format
//!
//! Segments are `;`-delimited (not `&`; this is not a query string) and
//! each segment splits at its first `=`. Names and values are
//! percent-encoded over a widened RFC 3986 safe set; `;` is always escaped,
//! `=` is escaped in names, and each type declares what else its values
//! reserve (the `set` type reserves `,`, its member separator).
//!
//! ## Example
//!
//! ```
//! use octothorpe::HashState;
//!
//! let mut state = HashState::new(["q", "tags:set"]).unwrap();
//! state.set_hash("#q=hello%20world;tags=b,a");
//! assert_eq!(state.scalar("q"), Some("hello world"));
//! assert_eq!(state.get_hash(), "#q=hello%20world;tags=a,b");
//!
//! // `with` and `without` never mutate the receiver.
//! let tagged = state.with("tags", "c").unwrap();
//! assert_eq!(tagged.get_hash(), "#q=hello%20world;tags=a,b,c");
//! assert_eq!(state.get_hash(), "#q=hello%20world;tags=a,b");
//!
//! let untagged = state.without("tags", Some("b"));
//! assert_eq!(untagged.get_hash(), "#q=hello%20world;tags=a");
//! ```
//!
//! ## Custom types
//!
//! Register a [`types::TypeDescriptor`] (or a [`types::ParamType`] impl)
//! before constructing states, then declare parameters against the new tag.
//! The registry is meant to be frozen once construction starts; hosts that
//! register from multiple threads must provide their own coordination.
//!
//! The host environment owns the actual location: it feeds the current raw
//! fragment into [`HashState::set_hash`] and writes
//! [`HashState::get_hash`]'s result back. The codec itself only ever sees
//! plain strings.

// ============================================================================
// Module Declarations
// ============================================================================

pub mod encode;
mod error;
mod state;
pub mod types;
mod value;

pub use error::ParamError;
pub use state::{Declaration, HashState, Param};
pub use types::{lookup_type, register_type, ParamType, TypeDescriptor};
pub use value::{Update, Value};
