//! Job configuration schemas
//!
//! Turns hand-written, loosely-typed configuration into something the rest
//! of the client can trust:
//! - [`Schema`] describes a target type ahead of time
//! - [`decode`] resolves a loose [`Value`] against a schema, including
//!   structurally discriminated unions
//! - [`coerce`] normalizes a value into the string-or-null [`WireTree`]
//!   the submission endpoints accept

pub mod coerce;
pub mod decode;
pub mod error;
pub mod schema;
pub mod value;
pub mod wire;

pub use coerce::{coerce, coerce_json, coerce_root};
pub use decode::{decode, decode_into, decode_into_with, decode_with, DecodeOptions, Decoded};
pub use error::{CoerceError, DecodeError};
pub use schema::{Describe, EnumMember, EnumSchema, Field, Primitive, RecordSchema, Schema, UnionSchema};
pub use value::{Value, ValueKind, ROOT_PATH};
pub use wire::WireTree;
