//! Leaf coercion
//!
//! The submission endpoints take string-or-null leaves only. Numbers and
//! booleans are accepted on input and rendered to their string form here;
//! anything else is rejected with the path of the offending value.

use std::collections::BTreeMap;

use crate::error::CoerceError;
use crate::value::{child_path, Value, ROOT_PATH};
use crate::wire::WireTree;

/// Coerce a loose value into a wire tree, reporting errors relative to `path`.
pub fn coerce(value: &Value, path: &str) -> Result<WireTree, CoerceError> {
    if let Some(text) = leaf_text(value) {
        return Ok(WireTree::String(text));
    }
    match value {
        Value::Null => Ok(WireTree::Null),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| coerce(item, &child_path(path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(WireTree::Sequence),
        Value::Mapping(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), coerce(v, &child_path(path, k))?)))
            .collect::<Result<BTreeMap<_, _>, CoerceError>>()
            .map(WireTree::Mapping),
        _ => Err(CoerceError {
            path: path.to_string(),
            kind: value.kind(),
        }),
    }
}

/// Canonical string form of a scalar leaf, shared by [`coerce`] and [`coerce_json`].
fn leaf_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Unsigned(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce from the root path (`json`).
pub fn coerce_root(value: &Value) -> Result<WireTree, CoerceError> {
    coerce(value, ROOT_PATH)
}

/// Coerce a JSON value. JSON carries no unsupported leaf types, so this
/// cannot fail.
pub fn coerce_json(value: &serde_json::Value) -> WireTree {
    match value {
        serde_json::Value::Null => WireTree::Null,
        serde_json::Value::Bool(b) => WireTree::String(b.to_string()),
        serde_json::Value::Number(n) => leaf_text(&Value::from(serde_json::Value::Number(n.clone())))
            .map_or(WireTree::Null, WireTree::String),
        serde_json::Value::String(s) => WireTree::String(s.clone()),
        serde_json::Value::Array(items) => WireTree::Sequence(items.iter().map(coerce_json).collect()),
        serde_json::Value::Object(map) => WireTree::Mapping(
            map.iter().map(|(k, v)| (k.clone(), coerce_json(v))).collect(),
        ),
    }
}
