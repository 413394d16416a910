//! Error types for decoding and coercion.

use crate::value::ValueKind;

/// Leaf coercion saw a value the wire format cannot carry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Type {kind} used for parameter {path} is not a number or a string")]
pub struct CoerceError {
    /// Location of the offending value, e.g. `json[tasks][0][weird_field]`.
    pub path: String,
    pub kind: ValueKind,
}

/// Structural decoding failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("{path}: no alternative of {schema} matches the input shape")]
    NoMatchingAlternative { path: String, schema: String },

    #[error("{path}: unknown field {field:?} for {schema}")]
    UnknownField {
        path: String,
        schema: String,
        field: String,
    },

    #[error("{path}: missing required field {field:?} for {schema}")]
    MissingField {
        path: String,
        schema: String,
        field: String,
    },

    #[error("{path}: expected {expected}, found {found}")]
    UnexpectedKind {
        path: String,
        expected: String,
        found: ValueKind,
    },

    #[error("{path}: {value:?} is not a member of {schema}")]
    NotAMember {
        path: String,
        schema: String,
        value: String,
    },

    #[error("decoded value does not fit {target}: {message}")]
    Conversion { target: String, message: String },
}

impl DecodeError {
    /// Path of the offending value, when the failure is positional.
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::NoMatchingAlternative { path, .. }
            | DecodeError::UnknownField { path, .. }
            | DecodeError::MissingField { path, .. }
            | DecodeError::UnexpectedKind { path, .. }
            | DecodeError::NotAMember { path, .. } => Some(path),
            DecodeError::Conversion { .. } => None,
        }
    }
}
