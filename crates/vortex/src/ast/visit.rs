//! Double-dispatch traversal over the AST
//!
//! `accept` hands a node to the matching `visit_*` method. A visitor that wants
//! to descend calls `accept_children` from inside its `visit_*` method, which
//! forwards `accept` to every owned child, left to right. There are no default
//! methods: adding a node type breaks every visitor until it handles the new node.

use super::expr::{
    Binary, Edge, Expr, IntLiteral, Property, Relation, StringLiteral, SumCall, Vertex, VertexTerm,
};
use super::statement::{
    EdgeDef, Program, PropertyDef, PropertyInit, QueryStatement, RelationInit, SchemaDef, Statement,
    VertexInit,
};

pub trait Visitor {
    fn visit_program(&mut self, node: &Program);
    fn visit_schema_def(&mut self, node: &SchemaDef);
    fn visit_property_def(&mut self, node: &PropertyDef);
    fn visit_edge_def(&mut self, node: &EdgeDef);
    fn visit_vertex_init(&mut self, node: &VertexInit);
    fn visit_property_init(&mut self, node: &PropertyInit);
    fn visit_relation_init(&mut self, node: &RelationInit);
    fn visit_query_statement(&mut self, node: &QueryStatement);
    fn visit_binary(&mut self, node: &Binary);
    fn visit_int_literal(&mut self, node: &IntLiteral);
    fn visit_string_literal(&mut self, node: &StringLiteral);
    fn visit_property(&mut self, node: &Property);
    fn visit_vertex(&mut self, node: &Vertex);
    fn visit_vertex_term(&mut self, node: &VertexTerm);
    fn visit_edge(&mut self, node: &Edge);
    fn visit_relation(&mut self, node: &Relation);
    fn visit_sum_call(&mut self, node: &SumCall);
}

// ============ Statements ============

impl Program {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_program(self);
    }

    pub fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for statement in &self.statements {
            statement.accept(visitor);
        }
    }
}

impl Statement {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Statement::Schema(node) => node.accept(visitor),
            Statement::Edge(node) => node.accept(visitor),
            Statement::Vertex(node) => node.accept(visitor),
            Statement::Relation(node) => node.accept(visitor),
            Statement::Query(node) => node.accept(visitor),
        }
    }
}

impl SchemaDef {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_schema_def(self);
    }

    pub fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for property in &self.properties {
            property.accept(visitor);
        }
    }
}

impl PropertyDef {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_property_def(self);
    }
}

impl EdgeDef {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_edge_def(self);
    }
}

impl VertexInit {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_vertex_init(self);
    }

    pub fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for property in &self.properties {
            property.accept(visitor);
        }
    }
}

impl PropertyInit {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_property_init(self);
    }
}

impl RelationInit {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_relation_init(self);
    }
}

impl QueryStatement {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_query_statement(self);
    }

    pub fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.expression.accept(visitor);
    }
}

// ============ Expressions ============

impl Expr {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Expr::Binary(node) => node.accept(visitor),
            Expr::Int(node) => node.accept(visitor),
            Expr::Str(node) => node.accept(visitor),
            Expr::Property(node) => node.accept(visitor),
            Expr::VertexTerm(node) => node.accept(visitor),
            Expr::Relation(node) => node.accept(visitor),
            Expr::Sum(node) => node.accept(visitor),
        }
    }
}

impl Binary {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_binary(self);
    }

    pub fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.left.accept(visitor);
        self.right.accept(visitor);
    }
}

impl IntLiteral {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_int_literal(self);
    }
}

impl StringLiteral {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_string_literal(self);
    }
}

impl Property {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_property(self);
    }
}

impl Vertex {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_vertex(self);
    }
}

impl VertexTerm {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_vertex_term(self);
    }

    pub fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.vertex.accept(visitor);
        if let Some(condition) = &self.condition {
            condition.accept(visitor);
        }
    }
}

impl Edge {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_edge(self);
    }
}

impl Relation {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_relation(self);
    }

    pub fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.edge.accept(visitor);
        self.vertex.accept(visitor);
    }
}

impl SumCall {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_sum_call(self);
    }

    pub fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for arg in &self.args {
            arg.accept(visitor);
        }
    }
}
