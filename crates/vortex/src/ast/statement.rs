//! Top-level statement nodes
//!
//! Definitions (`Schema`, `Edge`, `Vertex`, `Relation`) are keyed by name when
//! handed to a graph store; `Query` carries an expression for an evaluator.

use serde::{Deserialize, Serialize};

use super::expr::Expr;
use super::{EdgeType, Literal, PropertyType};
use crate::lexer::{Token, TokenKind};

/// Root of every successful parse
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `Schema Person { name string age int }`
    Schema(SchemaDef),
    /// `Edge FriendsWith TwoWay`
    Edge(EdgeDef),
    /// `Vertex Harry Person { .name = "Harry" }`
    Vertex(VertexInit),
    /// `Relation LivesIn { Harry London }`
    Relation(RelationInit),
    /// `Query <expression>`
    Query(QueryStatement),
}

impl Statement {
    /// Store key of a definition; queries have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Statement::Schema(s) => Some(&s.name),
            Statement::Edge(e) => Some(&e.name),
            Statement::Vertex(v) => Some(&v.name),
            Statement::Relation(r) => Some(&r.relation),
            Statement::Query(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    pub name: String,
    pub properties: Vec<PropertyDef>,
}

impl SchemaDef {
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    /// The `int` / `string` keyword token as written
    pub type_token: Token,
}

impl PropertyDef {
    pub fn ty(&self) -> Option<PropertyType> {
        match self.type_token.kind {
            TokenKind::IntType => Some(PropertyType::Int),
            TokenKind::StringType => Some(PropertyType::String),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    pub name: String,
    pub edge_type: EdgeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexInit {
    pub schema: String,
    pub name: String,
    pub properties: Vec<PropertyInit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInit {
    pub name: String,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationInit {
    pub left: String,
    pub relation: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStatement {
    pub expression: Expr,
}
