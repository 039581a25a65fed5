//! Runtime values for query evaluation
//!
//! `Value` is a closed set of variants. Each operation below is defined for
//! some combinations of variants; every other combination is an
//! `InvalidOperation` error rather than a coercion.
//!
//! | op                    | int | bool | string | list | record |
//! |-----------------------|-----|------|--------|------|--------|
//! | `add/sub/mul/div`     |  x  |      |        |      |        |
//! | `equal`               |  x  |  x   |   x    |      |   x    |
//! | `less_than`           |  x  |  x   |   x    |      |   x    |
//! | `and/or`              |  x  |  x   |        |  x   |        |
//! | `get_property`        |     |      |        |      |   x    |
//! | `repr`                |  x  |  x   |   x    |  x   |   x    |

mod list;
mod record;

pub use list::List;
pub use record::Record;

use std::fmt::{self, Display};

use serde::Serialize;
use thiserror::Error;

use crate::ast::{Literal, PropertyType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Unsupported operation '{op}' between {left} and {right}")]
    InvalidOperation {
        op: &'static str,
        left: ValueKind,
        right: ValueKind,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow in '{op}'")]
    Overflow { op: &'static str },

    #[error("Operand is of unknown type: {0}")]
    UnknownType(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("List elements are of different types: expected {expected}, found {found}")]
    UnhomogeneousType { expected: String, found: String },

    #[error("Property '{field}' expects {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: PropertyType,
        found: ValueKind,
    },
}

type Result<T> = std::result::Result<T, ValueError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Bool,
    Str,
    List,
    Record,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Str => "string",
            ValueKind::List => "list",
            ValueKind::Record => "record",
        };
        write!(f, "{}", s)
    }
}

/// A dynamically typed runtime value.
///
/// The derived `PartialEq` is exact structural identity, meant for tests and
/// containers. Query semantics go through [`Value::equal`], which rejects
/// comparisons across variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    List(List),
    Record(Record),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Record(_) => ValueKind::Record,
        }
    }

    /// Runtime type as shown in diagnostics: the type name for records,
    /// the variant name otherwise.
    pub fn type_label(&self) -> String {
        match self {
            Value::Record(record) => record.type_name().to_string(),
            other => other.kind().to_string(),
        }
    }

    /// Same variant and, for records, the same shape.
    pub fn same_type(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Record(a), Value::Record(b)) => a.same_shape(b),
            _ => self.kind() == other.kind(),
        }
    }

    fn invalid(&self, op: &'static str, other: &Value) -> ValueError {
        ValueError::InvalidOperation {
            op,
            left: self.kind(),
            right: other.kind(),
        }
    }

    // ============ Arithmetic ============

    fn arithmetic(
        &self,
        other: &Value,
        op: &'static str,
        f: fn(i64, i64) -> Option<i64>,
    ) -> Result<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => f(*a, *b)
                .map(Value::Int)
                .ok_or(ValueError::Overflow { op }),
            _ => Err(self.invalid(op, other)),
        }
    }

    pub fn add(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, "+", i64::checked_add)
    }

    pub fn sub(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, "-", i64::checked_sub)
    }

    pub fn mul(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, "*", i64::checked_mul)
    }

    pub fn div(&self, other: &Value) -> Result<Value> {
        if matches!((self, other), (Value::Int(_), Value::Int(0))) {
            return Err(ValueError::DivisionByZero);
        }
        self.arithmetic(other, "/", i64::checked_div)
    }

    // ============ Equality / Comparison ============

    pub fn equal(&self, other: &Value) -> Result<bool> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a == b),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            (Value::Record(a), Value::Record(b)) => a.equal(b),
            _ => Err(self.invalid("=", other)),
        }
    }

    pub fn less_than(&self, other: &Value) -> Result<bool> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a < b),
            (Value::Bool(a), Value::Bool(b)) => Ok(a < b),
            (Value::Str(a), Value::Str(b)) => Ok(a < b),
            (Value::Record(a), Value::Record(b)) => a.less_than(b),
            _ => Err(self.invalid("<", other)),
        }
    }

    // ============ Logical ============

    /// Truthiness of ints and bools: `0` and `false` are falsy.
    /// `None` for variants without a truth value.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Value::Int(n) => Some(*n != 0),
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Scalars: the left operand if falsy, else the right one.
    /// Lists: set intersection.
    pub fn and(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Ok(Value::List(a.intersect(b)?)),
            _ => match (self.truthy(), other.truthy()) {
                (Some(false), Some(_)) => Ok(self.clone()),
                (Some(true), Some(_)) => Ok(other.clone()),
                _ => Err(self.invalid("and", other)),
            },
        }
    }

    /// Scalars: the left operand if truthy, else the right one.
    /// Lists: set union.
    pub fn or(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Ok(Value::List(a.union(b)?)),
            _ => match (self.truthy(), other.truthy()) {
                (Some(true), Some(_)) => Ok(self.clone()),
                (Some(false), Some(_)) => Ok(other.clone()),
                _ => Err(self.invalid("or", other)),
            },
        }
    }

    // ============ Property access / representation ============

    pub fn get_property(&self, name: &str) -> Result<&Value> {
        match self {
            Value::Record(record) => record.get_property(name),
            _ => Err(ValueError::InvalidOperation {
                op: ".",
                left: self.kind(),
                right: ValueKind::Str,
            }),
        }
    }

    pub fn repr(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(list) => list.repr(),
            Value::Record(record) => record.repr(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(n) => Value::Int(*n),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }
}
