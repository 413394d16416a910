//! Structural decoder
//!
//! Converts a loose [`Value`] into a [`Decoded`] tree shaped by a [`Schema`].
//!
//! Resolution rules, in order:
//! 1. sequence schemas decode element-wise, preserving order
//! 2. enumerations match on a member's underlying value
//! 3. unions take the first alternative, in declaration order, whose shape
//!    matches: records by exact key set, enumerations by membership
//! 4. records decode key by key; optional fields accept null
//! 5. primitives pass through unchanged, unless [`DecodeOptions::check_primitives`]
//!    is set; [`decode_into`] sets it so kind mismatches keep their path
//!
//! Ambiguous unions are not rejected; declaration order is the tie-break.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::error::DecodeError;
use crate::schema::{Describe, EnumSchema, Primitive, RecordSchema, Schema, UnionSchema};
use crate::value::{child_path, Value, ValueKind, ROOT_PATH};

/// Decoder behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject records that omit a required field.
    pub require_fields: bool,
    /// Reject primitive leaves whose kind differs from the schema's.
    pub check_primitives: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            require_fields: true,
            check_primitives: false,
        }
    }
}

impl DecodeOptions {
    /// Leave absent required fields unset instead of failing.
    pub fn lenient() -> Self {
        Self {
            require_fields: false,
            ..Self::default()
        }
    }
}

/// An instance of a schema, produced by [`decode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Primitive leaf, kept exactly as received.
    Scalar(Value),
    Enum {
        schema: String,
        member: String,
        value: String,
    },
    Record {
        schema: String,
        fields: BTreeMap<String, Decoded>,
    },
    Sequence(Vec<Decoded>),
    Map(BTreeMap<String, Decoded>),
    /// The union alternative that matched, wrapping its decoded value.
    Variant {
        alternative: String,
        value: Box<Decoded>,
    },
}

impl Decoded {
    /// Name of the matched union alternative, if this is a variant.
    pub fn alternative(&self) -> Option<&str> {
        match self {
            Decoded::Variant { alternative, .. } => Some(alternative),
            _ => None,
        }
    }

    /// Field of a record (looking through a variant wrapper).
    pub fn field(&self, name: &str) -> Option<&Decoded> {
        match self {
            Decoded::Record { fields, .. } => fields.get(name),
            Decoded::Variant { value, .. } => value.field(name),
            _ => None,
        }
    }

    /// Re-encode as a loose value. Unions are transparent and enumerations
    /// render as their underlying value, so decoding the result again under
    /// the same schema yields an equal tree.
    pub fn to_value(&self) -> Value {
        match self {
            Decoded::Scalar(v) => v.clone(),
            Decoded::Enum { value, .. } => Value::String(value.clone()),
            Decoded::Record { fields, .. } => Value::Mapping(
                fields.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
            ),
            Decoded::Sequence(items) => Value::Sequence(items.iter().map(Decoded::to_value).collect()),
            Decoded::Map(entries) => Value::Mapping(
                entries.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
            ),
            Decoded::Variant { value, .. } => value.to_value(),
        }
    }

    /// Externally tagged JSON, the representation serde-derived models read:
    /// variants become `{"<alternative>": ...}` and enumerations their member name.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Decoded::Scalar(v) => v.to_json(),
            Decoded::Enum { member, .. } => serde_json::Value::String(member.clone()),
            Decoded::Record { fields, .. } => serde_json::Value::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Decoded::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Decoded::to_json).collect())
            }
            Decoded::Map(entries) => serde_json::Value::Object(
                entries.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Decoded::Variant { alternative, value } => {
                let mut tagged = serde_json::Map::new();
                tagged.insert(alternative.clone(), value.to_json());
                serde_json::Value::Object(tagged)
            }
        }
    }
}

/// Decode `value` under `schema` with default (strict) options.
pub fn decode(schema: &Schema, value: &Value) -> Result<Decoded, DecodeError> {
    decode_with(schema, value, DecodeOptions::default())
}

/// Decode `value` under `schema`.
pub fn decode_with(
    schema: &Schema,
    value: &Value,
    options: DecodeOptions,
) -> Result<Decoded, DecodeError> {
    Decoder { options }.decode_at(schema, value, ROOT_PATH)
}

/// Decode `value` under `T`'s schema and convert to `T`.
pub fn decode_into<T>(value: &Value) -> Result<T, DecodeError>
where
    T: Describe + DeserializeOwned,
{
    decode_into_with(value, DecodeOptions::default())
}

/// [`decode_into`] with explicit options. Primitive kinds are always
/// checked here.
pub fn decode_into_with<T>(value: &Value, options: DecodeOptions) -> Result<T, DecodeError>
where
    T: Describe + DeserializeOwned,
{
    let schema = T::schema();
    let options = DecodeOptions {
        check_primitives: true,
        ..options
    };
    let decoded = decode_with(&schema, value, options)?;
    serde_json::from_value(decoded.to_json()).map_err(|e| DecodeError::Conversion {
        target: schema.name(),
        message: e.to_string(),
    })
}

struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    fn decode_at(&self, schema: &Schema, value: &Value, path: &str) -> Result<Decoded, DecodeError> {
        match schema {
            Schema::Sequence(item) => match value {
                Value::Sequence(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| self.decode_at(item, v, &child_path(path, i)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Decoded::Sequence),
                other => Err(unexpected(path, schema, other)),
            },
            Schema::Enum(e) => decode_enum(e, value, path),
            Schema::Union(u) => self.decode_union(u, value, path),
            Schema::Record(r) => match value {
                Value::Mapping(map) => self.decode_record(r, map, path),
                other => Err(unexpected(path, schema, other)),
            },
            Schema::Map(inner) => match value {
                Value::Mapping(map) => map
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), self.decode_at(inner, v, &child_path(path, k))?)))
                    .collect::<Result<BTreeMap<_, _>, DecodeError>>()
                    .map(Decoded::Map),
                other => Err(unexpected(path, schema, other)),
            },
            Schema::Primitive(p) => {
                if self.options.check_primitives && !primitive_matches(*p, value.kind()) {
                    return Err(unexpected(path, schema, value));
                }
                Ok(Decoded::Scalar(value.clone()))
            }
        }
    }

    fn decode_union(
        &self,
        union: &UnionSchema,
        value: &Value,
        path: &str,
    ) -> Result<Decoded, DecodeError> {
        let chosen = union
            .alternatives
            .iter()
            .find(|alternative| shape_matches(alternative, value))
            .ok_or_else(|| DecodeError::NoMatchingAlternative {
                path: path.to_string(),
                schema: union.name.clone(),
            })?;

        let decoded = self.decode_at(chosen, value, path)?;
        Ok(Decoded::Variant {
            alternative: chosen.name(),
            value: Box::new(decoded),
        })
    }

    fn decode_record(
        &self,
        record: &RecordSchema,
        map: &BTreeMap<String, Value>,
        path: &str,
    ) -> Result<Decoded, DecodeError> {
        let mut fields = BTreeMap::new();

        for (key, value) in map {
            let field_path = child_path(path, key);
            let field = record.field(key).ok_or_else(|| DecodeError::UnknownField {
                path: field_path.clone(),
                schema: record.name.clone(),
                field: key.clone(),
            })?;

            let decoded = if field.optional && value.is_null() {
                Decoded::Scalar(Value::Null)
            } else {
                self.decode_at(&field.schema, value, &field_path)?
            };
            fields.insert(key.clone(), decoded);
        }

        if self.options.require_fields {
            if let Some(missing) = record
                .fields
                .iter()
                .find(|f| !f.optional && !map.contains_key(&f.name))
            {
                return Err(DecodeError::MissingField {
                    path: path.to_string(),
                    schema: record.name.clone(),
                    field: missing.name.clone(),
                });
            }
        }

        Ok(Decoded::Record {
            schema: record.name.clone(),
            fields,
        })
    }
}

fn decode_enum(schema: &EnumSchema, value: &Value, path: &str) -> Result<Decoded, DecodeError> {
    let member = value
        .as_str()
        .and_then(|s| schema.member_by_value(s))
        .ok_or_else(|| DecodeError::NotAMember {
            path: path.to_string(),
            schema: schema.name.clone(),
            value: value.to_json().to_string(),
        })?;

    Ok(Decoded::Enum {
        schema: schema.name.clone(),
        member: member.name.clone(),
        value: member.value.clone(),
    })
}

/// Shape test used to pick a union alternative.
fn shape_matches(schema: &Schema, value: &Value) -> bool {
    match (schema, value) {
        (Schema::Record(r), Value::Mapping(map)) => r.has_exact_keys(map.keys()),
        (Schema::Enum(e), Value::String(s)) => e.member_by_value(s).is_some(),
        (Schema::Union(u), _) => u.alternatives.iter().any(|alt| shape_matches(alt, value)),
        (Schema::Sequence(_), Value::Sequence(_)) => true,
        (Schema::Map(_), Value::Mapping(_)) => true,
        (Schema::Primitive(p), v) => primitive_matches(*p, v.kind()),
        _ => false,
    }
}

fn primitive_matches(primitive: Primitive, kind: ValueKind) -> bool {
    matches!(
        (primitive, kind),
        (Primitive::String, ValueKind::String)
            | (Primitive::Integer, ValueKind::Integer)
            | (Primitive::Float, ValueKind::Float)
            | (Primitive::Float, ValueKind::Integer)
            | (Primitive::Boolean, ValueKind::Bool)
            | (
                Primitive::Scalar,
                ValueKind::String | ValueKind::Integer | ValueKind::Float | ValueKind::Bool
            )
    )
}

fn unexpected(path: &str, schema: &Schema, found: &Value) -> DecodeError {
    DecodeError::UnexpectedKind {
        path: path.to_string(),
        expected: schema.name(),
        found: found.kind(),
    }
}
