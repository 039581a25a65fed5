//! Records: named values with an ordered set of properties

use indexmap::IndexMap;
use serde::Serialize;

use super::{Result, Value, ValueError, ValueKind};
use crate::ast::{Literal, PropertyType, SchemaDef, VertexInit};

/// A user-defined value, e.g. a vertex instantiated from its schema.
///
/// Properties keep insertion order. Records compare only with records of the
/// same shape, and ordering walks the properties in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    type_name: String,
    properties: IndexMap<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>, properties: IndexMap<String, Value>) -> Self {
        Self {
            type_name: type_name.into(),
            properties,
        }
    }

    /// Instantiate a vertex against its schema.
    ///
    /// Properties come out in schema order. Every declared property must be
    /// initialized exactly by a literal of the declared type, and no other
    /// property may be initialized.
    pub fn from_vertex(schema: &SchemaDef, vertex: &VertexInit) -> Result<Self> {
        if vertex.schema != schema.name {
            return Err(ValueError::UnknownType(vertex.schema.clone()));
        }
        if let Some(extra) = vertex
            .properties
            .iter()
            .find(|init| schema.property(&init.name).is_none())
        {
            return Err(ValueError::UnknownField(extra.name.clone()));
        }

        let mut properties = IndexMap::with_capacity(schema.properties.len());
        for def in &schema.properties {
            let init = vertex
                .properties
                .iter()
                .find(|init| init.name == def.name)
                .ok_or_else(|| ValueError::UnknownField(def.name.clone()))?;
            let ty = def
                .ty()
                .ok_or_else(|| ValueError::UnknownType(def.type_token.text.clone()))?;

            let value = match (ty, &init.value) {
                (PropertyType::Int, Literal::Int(n)) => Value::Int(*n),
                (PropertyType::String, Literal::Str(s)) => Value::Str(s.clone()),
                (expected, literal) => {
                    return Err(ValueError::TypeMismatch {
                        field: def.name.clone(),
                        expected,
                        found: Value::from(literal).kind(),
                    });
                }
            };
            properties.insert(def.name.clone(), value);
        }

        Ok(Self::new(&schema.name, properties))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get_property(&self, name: &str) -> Result<&Value> {
        self.properties
            .get(name)
            .ok_or_else(|| ValueError::UnknownField(name.to_string()))
    }

    /// Same type name and the same property names in the same order.
    pub fn same_shape(&self, other: &Record) -> bool {
        self.type_name == other.type_name && self.properties.keys().eq(other.properties.keys())
    }

    fn check_shape(&self, other: &Record, op: &'static str) -> Result<()> {
        if !self.same_shape(other) {
            return Err(ValueError::InvalidOperation {
                op,
                left: ValueKind::Record,
                right: ValueKind::Record,
            });
        }
        Ok(())
    }

    /// Pairwise equal values. Records of different shapes do not compare.
    pub fn equal(&self, other: &Record) -> Result<bool> {
        self.check_shape(other, "=")?;
        for (value, theirs) in self.properties.values().zip(other.properties.values()) {
            if !value.equal(theirs)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Lexicographic over the shared property order. The first property that
    /// differs decides.
    pub fn less_than(&self, other: &Record) -> Result<bool> {
        self.check_shape(other, "<")?;
        for (value, theirs) in self.properties.values().zip(other.properties.values()) {
            if !value.equal(theirs)? {
                return value.less_than(theirs);
            }
        }
        Ok(false)
    }

    /// `Person{name: "John", age: 26}`
    pub fn repr(&self) -> String {
        let properties: Vec<String> = self
            .properties
            .iter()
            .map(|(name, value)| match value {
                Value::Str(s) => format!("{}: {:?}", name, s),
                other => format!("{}: {}", name, other.repr()),
            })
            .collect();
        format!("{}{{{}}}", self.type_name, properties.join(", "))
    }
}
