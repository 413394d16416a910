//! Schema descriptions
//!
//! An explicit, ahead-of-time description of a target configuration type.
//! Typed models publish one through [`Describe`]; the decoder consumes it.
//!
//! ```
//! use dbx_schema::Schema;
//!
//! let dependency = Schema::record("TaskDependency")
//!     .required("task_key", Schema::string())
//!     .optional("outcome", Schema::string())
//!     .build();
//! assert_eq!(dependency.name(), "TaskDependency");
//! ```

/// Primitive leaf types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Float,
    Boolean,
    /// Any of the above; for free-form settings such as `spark_conf`.
    Scalar,
}

/// A member of an enumeration: symbolic name plus underlying value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: String,
}

/// A closed set of named values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl EnumSchema {
    /// Find the member whose underlying value equals `value`.
    pub fn member_by_value(&self, value: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }
}

/// A named field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    /// Optional fields accept null and may be absent.
    pub optional: bool,
}

/// An ordered set of named, typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<Field>,
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True when `keys` is exactly this record's field-name set.
    pub fn has_exact_keys<'a>(&self, keys: impl IntoIterator<Item = &'a String>) -> bool {
        let mut count = 0;
        for key in keys {
            if self.field(key).is_none() {
                return false;
            }
            count += 1;
        }
        count == self.fields.len()
    }
}

/// Alternatives of a structurally discriminated union.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSchema {
    pub name: String,
    /// Evaluated in declaration order; the first match wins.
    pub alternatives: Vec<Schema>,
}

/// Description of a target type.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Primitive(Primitive),
    Enum(EnumSchema),
    Record(RecordSchema),
    Sequence(Box<Schema>),
    /// String-keyed mapping whose values all share one schema.
    Map(Box<Schema>),
    Union(UnionSchema),
}

impl Schema {
    pub fn string() -> Self {
        Schema::Primitive(Primitive::String)
    }

    pub fn integer() -> Self {
        Schema::Primitive(Primitive::Integer)
    }

    pub fn float() -> Self {
        Schema::Primitive(Primitive::Float)
    }

    pub fn boolean() -> Self {
        Schema::Primitive(Primitive::Boolean)
    }

    pub fn scalar() -> Self {
        Schema::Primitive(Primitive::Scalar)
    }

    /// Enumeration whose member names equal their underlying values.
    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::Enum(EnumSchema {
            name: name.into(),
            members: members
                .into_iter()
                .map(|m| {
                    let value = m.into();
                    EnumMember {
                        name: value.clone(),
                        value,
                    }
                })
                .collect(),
        })
    }

    /// Enumeration with distinct member names and values.
    pub fn enumeration_with_values<I, N, V>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        Schema::Enum(EnumSchema {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(n, v)| EnumMember {
                    name: n.into(),
                    value: v.into(),
                })
                .collect(),
        })
    }

    pub fn record(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn sequence_of(item: Schema) -> Self {
        Schema::Sequence(Box::new(item))
    }

    pub fn map_of(value: Schema) -> Self {
        Schema::Map(Box::new(value))
    }

    pub fn union(name: impl Into<String>, alternatives: Vec<Schema>) -> Self {
        Schema::Union(UnionSchema {
            name: name.into(),
            alternatives,
        })
    }

    /// Human-readable name, used in error messages.
    pub fn name(&self) -> String {
        match self {
            Schema::Primitive(Primitive::String) => "string".to_string(),
            Schema::Primitive(Primitive::Integer) => "integer".to_string(),
            Schema::Primitive(Primitive::Float) => "float".to_string(),
            Schema::Primitive(Primitive::Boolean) => "boolean".to_string(),
            Schema::Primitive(Primitive::Scalar) => "scalar".to_string(),
            Schema::Enum(e) => e.name.clone(),
            Schema::Record(r) => r.name.clone(),
            Schema::Sequence(item) => format!("sequence<{}>", item.name()),
            Schema::Map(value) => format!("map<{}>", value.name()),
            Schema::Union(u) => u.name.clone(),
        }
    }
}

/// Builder for [`RecordSchema`].
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: String,
    fields: Vec<Field>,
}

impl RecordBuilder {
    pub fn required(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.push(Field {
            name: name.into(),
            schema,
            optional: false,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.push(Field {
            name: name.into(),
            schema,
            optional: true,
        });
        self
    }

    pub fn build(self) -> Schema {
        Schema::Record(RecordSchema {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// Types that can describe their own shape.
pub trait Describe {
    fn schema() -> Schema;
}

impl Describe for String {
    fn schema() -> Schema {
        Schema::string()
    }
}

impl Describe for i64 {
    fn schema() -> Schema {
        Schema::integer()
    }
}

impl Describe for f64 {
    fn schema() -> Schema {
        Schema::float()
    }
}

impl Describe for bool {
    fn schema() -> Schema {
        Schema::boolean()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn schema() -> Schema {
        Schema::sequence_of(T::schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(schema: &Schema) -> &RecordSchema {
        match schema {
            Schema::Record(r) => r,
            other => panic!("expected record, got {}", other.name()),
        }
    }

    #[test]
    fn test_record_builder_keeps_order() {
        let schema = Schema::record("AutoScale")
            .required("min_workers", Schema::integer())
            .required("max_workers", Schema::integer())
            .build();
        let names: Vec<_> = record(&schema).fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["min_workers", "max_workers"]);
    }

    #[test]
    fn test_exact_keys() {
        let schema = Schema::record("Point")
            .required("x", Schema::integer())
            .optional("y", Schema::integer())
            .build();
        let r = record(&schema);
        let xy = ["x".to_string(), "y".to_string()];
        let x = ["x".to_string()];
        let xz = ["x".to_string(), "z".to_string()];
        assert!(r.has_exact_keys(xy.iter()));
        assert!(!r.has_exact_keys(x.iter()));
        assert!(!r.has_exact_keys(xz.iter()));
    }

    #[test]
    fn test_enum_member_lookup() {
        let schema = Schema::enumeration_with_values("Level", [("High", "H"), ("Low", "L")]);
        let Schema::Enum(e) = schema else {
            panic!("expected enum");
        };
        assert_eq!(e.member_by_value("H").map(|m| m.name.as_str()), Some("High"));
        assert!(e.member_by_value("High").is_none());
    }

    #[test]
    fn test_names() {
        assert_eq!(Schema::sequence_of(Schema::string()).name(), "sequence<string>");
        assert_eq!(Schema::map_of(Schema::integer()).name(), "map<integer>");
    }
}
