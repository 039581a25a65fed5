//! Graph store interface and an in-memory implementation
//!
//! Definitions are keyed by name: schemas, edges and vertices each live in
//! their own namespace. Relations are keyed by `(edge, left, right)`, so the
//! same edge may connect many vertex pairs but each pair only once.
//! Building adjacency for traversal is left to the store implementation.

use std::fmt::{self, Display};
use std::hash::Hash;

use indexmap::IndexMap;
use indexmap::map::Entry;
use thiserror::Error;

use crate::ast::{EdgeDef, Program, QueryStatement, RelationInit, SchemaDef, Statement, VertexInit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Schema,
    Edge,
    Vertex,
    Relation,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Schema => "Schema",
            EntityKind::Edge => "Edge",
            EntityKind::Vertex => "Vertex",
            EntityKind::Relation => "Relation",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: EntityKind, name: String },

    #[error("{kind} missing: {name}")]
    DoesNotExist { kind: EntityKind, name: String },
}

impl StoreError {
    fn missing(kind: EntityKind, name: impl Into<String>) -> Self {
        StoreError::DoesNotExist {
            kind,
            name: name.into(),
        }
    }
}

type Result<T> = std::result::Result<T, StoreError>;

/// Storage for the definitions a program declares.
///
/// Writes reject a name that is already taken. `write_vertex` requires the
/// vertex's schema, and `write_relation` requires both vertices and the edge.
pub trait GraphStore {
    fn write_schema(&mut self, schema: SchemaDef) -> Result<()>;
    fn read_schema(&self, name: &str) -> Result<&SchemaDef>;

    fn write_edge(&mut self, edge: EdgeDef) -> Result<()>;
    fn read_edge(&self, name: &str) -> Result<&EdgeDef>;

    fn write_vertex(&mut self, vertex: VertexInit) -> Result<()>;
    fn read_vertex(&self, name: &str) -> Result<&VertexInit>;

    fn write_relation(&mut self, relation: RelationInit) -> Result<()>;
    fn read_relation(&self, edge: &str, left: &str, right: &str) -> Result<&RelationInit>;
}

fn relation_name(edge: &str, left: &str, right: &str) -> String {
    format!("{} {{ {} {} }}", edge, left, right)
}

/// Insertion-ordered in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: IndexMap<String, SchemaDef>,
    edges: IndexMap<String, EdgeDef>,
    vertices: IndexMap<String, VertexInit>,
    relations: IndexMap<(String, String, String), RelationInit>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &SchemaDef> {
        self.schemas.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeDef> {
        self.edges.values()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &VertexInit> {
        self.vertices.values()
    }

    pub fn relations(&self) -> impl Iterator<Item = &RelationInit> {
        self.relations.values()
    }
}

fn insert_new<K: Hash + Eq, V>(
    map: &mut IndexMap<K, V>,
    key: K,
    value: V,
    kind: EntityKind,
    name: String,
) -> Result<()> {
    match map.entry(key) {
        Entry::Occupied(_) => Err(StoreError::AlreadyExists { kind, name }),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}

impl GraphStore for MemoryStore {
    fn write_schema(&mut self, schema: SchemaDef) -> Result<()> {
        let name = schema.name.clone();
        insert_new(&mut self.schemas, name.clone(), schema, EntityKind::Schema, name)
    }

    fn read_schema(&self, name: &str) -> Result<&SchemaDef> {
        self.schemas
            .get(name)
            .ok_or_else(|| StoreError::missing(EntityKind::Schema, name))
    }

    fn write_edge(&mut self, edge: EdgeDef) -> Result<()> {
        let name = edge.name.clone();
        insert_new(&mut self.edges, name.clone(), edge, EntityKind::Edge, name)
    }

    fn read_edge(&self, name: &str) -> Result<&EdgeDef> {
        self.edges
            .get(name)
            .ok_or_else(|| StoreError::missing(EntityKind::Edge, name))
    }

    fn write_vertex(&mut self, vertex: VertexInit) -> Result<()> {
        self.read_schema(&vertex.schema)?;
        let name = vertex.name.clone();
        insert_new(&mut self.vertices, name.clone(), vertex, EntityKind::Vertex, name)
    }

    fn read_vertex(&self, name: &str) -> Result<&VertexInit> {
        self.vertices
            .get(name)
            .ok_or_else(|| StoreError::missing(EntityKind::Vertex, name))
    }

    fn write_relation(&mut self, relation: RelationInit) -> Result<()> {
        self.read_vertex(&relation.left)?;
        self.read_vertex(&relation.right)?;
        self.read_edge(&relation.relation)?;

        let key = (
            relation.relation.clone(),
            relation.left.clone(),
            relation.right.clone(),
        );
        let name = relation_name(&key.0, &key.1, &key.2);
        insert_new(&mut self.relations, key, relation, EntityKind::Relation, name)
    }

    fn read_relation(&self, edge: &str, left: &str, right: &str) -> Result<&RelationInit> {
        let key = (edge.to_string(), left.to_string(), right.to_string());
        self.relations.get(&key).ok_or_else(|| {
            StoreError::missing(EntityKind::Relation, relation_name(edge, left, right))
        })
    }
}

/// Register every definition of `program` in order and hand back its queries.
///
/// Stops at the first store error; definitions written before it stay in the
/// store.
pub fn register_program<S: GraphStore + ?Sized>(
    store: &mut S,
    program: Program,
) -> Result<Vec<QueryStatement>> {
    let mut queries = Vec::new();
    for statement in program.statements {
        match statement {
            Statement::Schema(schema) => {
                log::debug!("registering schema {}", schema.name);
                store.write_schema(schema)?;
            }
            Statement::Edge(edge) => {
                log::debug!("registering edge {} ({})", edge.name, edge.edge_type);
                store.write_edge(edge)?;
            }
            Statement::Vertex(vertex) => {
                log::debug!("registering vertex {}: {}", vertex.name, vertex.schema);
                store.write_vertex(vertex)?;
            }
            Statement::Relation(relation) => {
                log::debug!(
                    "registering relation {}",
                    relation_name(&relation.relation, &relation.left, &relation.right)
                );
                store.write_relation(relation)?;
            }
            Statement::Query(query) => queries.push(query),
        }
    }
    Ok(queries)
}
