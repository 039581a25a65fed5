//! Expression nodes - what a `Query` statement carries

use serde::{Deserialize, Serialize};

use super::{BinOp, FuncType};
use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Binary operation: `a + b`, `.age > 3`, `x and y`
    Binary(Binary),

    /// Integer literal: `42`
    Int(IntLiteral),

    /// String literal: `"John"`
    Str(StringLiteral),

    /// Property access: `.name` or `P.name`
    Property(Property),

    /// Vertex with optional filter: `Person as P { .age > 3 }`
    VertexTerm(VertexTerm),

    /// Traversal: `[1..3]FriendsWith Person`
    Relation(Relation),

    /// Builtin call: `Sum(...)`
    Sum(SumCall),
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Int(IntLiteral { value })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str(StringLiteral {
            value: value.into(),
        })
    }

    pub fn binary(self, operator: Token, rhs: Expr) -> Self {
        Expr::Binary(Binary {
            left: Box::new(self),
            operator,
            right: Box::new(rhs),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

impl Binary {
    pub fn op(&self) -> Option<BinOp> {
        BinOp::from_token(self.operator.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntLiteral {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    /// Vertex alias the property is read from (`P` in `P.name`)
    pub alias: Option<String>,
}

/// A vertex pattern; `name` is `None` for the any-vertex unit `()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub name: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexTerm {
    pub vertex: Vertex,
    pub condition: Option<Box<Expr>>,
}

/// Edge pattern with hop-count bounds; `name` is `None` for any edge `()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub name: Option<String>,
    pub lower: u64,
    pub upper: u64,
}

impl Edge {
    /// Upper bound of an open-ended range
    pub const UNBOUNDED: u64 = u64::MAX;

    pub fn is_unbounded(&self) -> bool {
        self.upper == Self::UNBOUNDED
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub edge: Edge,
    pub vertex: VertexTerm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumCall {
    pub func: FuncType,
    pub args: Vec<Expr>,
}
