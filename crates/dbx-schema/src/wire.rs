//! Wire tree: the only shape accepted by the submission endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nested maps and sequences whose leaves are strings or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireTree {
    Null,
    String(String),
    Sequence(Vec<WireTree>),
    Mapping(BTreeMap<String, WireTree>),
}

impl WireTree {
    pub fn get(&self, key: &str) -> Option<&WireTree> {
        match self {
            WireTree::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireTree::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[WireTree]> {
        match self {
            WireTree::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Number of leaves (strings and nulls) in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            WireTree::Null | WireTree::String(_) => 1,
            WireTree::Sequence(items) => items.iter().map(WireTree::leaf_count).sum(),
            WireTree::Mapping(map) => map.values().map(WireTree::leaf_count).sum(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            WireTree::Null => serde_json::Value::Null,
            WireTree::String(s) => serde_json::Value::String(s.clone()),
            WireTree::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(WireTree::to_json).collect())
            }
            WireTree::Mapping(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<&str> for WireTree {
    fn from(s: &str) -> Self {
        WireTree::String(s.to_string())
    }
}
