//! AST types for the vortex DSL
//!
//! Split into:
//! - `statement`: top-level definitions and the query statement
//! - `expr`: query expressions (arithmetic, filters, traversals)
//! - `visit`: the double-dispatch visitor contract

pub mod expr;
pub mod statement;
pub mod visit;

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::lexer::TokenKind;

// Shared types used by both statement and expression nodes

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeType {
    OneWay,
    TwoWay,
}

impl EdgeType {
    pub const ALL: [EdgeType; 2] = [EdgeType::OneWay, EdgeType::TwoWay];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            EdgeType::OneWay => "OneWay",
            EdgeType::TwoWay => "TwoWay",
        }
    }
}

impl Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Builtin functions known to the lexer. Only `Sum` has a grammar production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuncType {
    Sum,
    Max,
    Min,
    StartsWith,
}

impl FuncType {
    pub const ALL: [FuncType; 4] = [
        FuncType::Sum,
        FuncType::Max,
        FuncType::Min,
        FuncType::StartsWith,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            FuncType::Sum => "Sum",
            FuncType::Max => "Max",
            FuncType::Min => "Min",
            FuncType::StartsWith => "StartsWith",
        }
    }
}

impl Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Equal => BinOp::Eq,
            TokenKind::NotEqual => BinOp::Ne,
            TokenKind::Less => BinOp::Lt,
            TokenKind::LessEqual => BinOp::Le,
            TokenKind::Greater => BinOp::Gt,
            TokenKind::GreaterEqual => BinOp::Ge,
            TokenKind::And => BinOp::And,
            TokenKind::Or => BinOp::Or,
            _ => return None,
        };
        Some(op)
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        };
        write!(f, "{}", s)
    }
}

/// Declared type of a schema property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Int,
    String,
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Int => write!(f, "int"),
            PropertyType::String => write!(f, "string"),
        }
    }
}

/// Literal assigned to a vertex property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Str(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

pub use expr::{
    Binary, Edge, Expr, IntLiteral, Property, Relation, StringLiteral, SumCall, Vertex, VertexTerm,
};
pub use statement::{
    EdgeDef, Program, PropertyDef, PropertyInit, QueryStatement, RelationInit, SchemaDef, Statement,
    VertexInit,
};
pub use visit::Visitor;
