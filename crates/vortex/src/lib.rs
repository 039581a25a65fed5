//! Vortex - a small graph query language
//!
//! Programs declare record schemas, edges, vertices and relations, then query
//! the resulting graph with path and filter expressions.
//!
//! ## Quick Start
//!
//! ```
//! use vortex::MemoryStore;
//!
//! let source = r#"
//!     Schema Person { name string age int }
//!     Edge FriendsWith TwoWay
//!     Vertex Ann Person { .name = "Ann" .age = 31 }
//!     Vertex Bob Person { .name = "Bob" .age = 29 }
//!     Relation FriendsWith { Ann Bob }
//!     Query Person as P { [1..2]FriendsWith Person { .age < P.age } }
//! "#;
//!
//! let mut store = MemoryStore::new();
//! let queries = vortex::load(source, &mut store)?;
//! assert_eq!(queries.len(), 1);
//!
//! let ann = vortex::instantiate(&store, "Ann")?;
//! assert_eq!(ann.repr(), r#"Person{name: "Ann", age: 31}"#);
//! # Ok::<(), vortex::VortexError>(())
//! ```
//!
//! ## Syntax
//!
//! - `Schema Name { prop int prop string }` declares a record type
//! - `Edge Name OneWay | TwoWay` declares an edge type
//! - `Vertex Name Schema { .prop = literal }` instantiates a vertex
//! - `Relation Edge { Left Right }` connects two vertices
//! - `Query expr` where `expr` combines `and or`, comparisons, `+ - * /`,
//!   `.prop`, `Alias.prop`, `Vertex as Alias { filter }`, `[lo..hi]Edge Vertex`
//!   and `Sum expr, ...`
//!
//! ## Diagnostics
//!
//! Parsing stops at the first error, which renders with its source line:
//!
//! ```text
//! Error: Unexpected "{" found
//! 1	|	Query Person as {
//! 		                ^--Did you mean "<identifier>"?
//! ```

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod parse;
pub mod store;
pub mod value;

use thiserror::Error;

// ============ Primary Public API ============

pub use ast::{Program, Visitor};
pub use diagnostic::{Expected, ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind, TokenSource};
pub use parse::{ParseOptions, Parser, parse};
pub use store::{EntityKind, GraphStore, MemoryStore, StoreError, register_program};
pub use value::{List, Record, Value, ValueError, ValueKind};

use ast::QueryStatement;

/// Parse `source` and register its definitions in `store`.
///
/// Returns the program's queries in source order.
pub fn load<S: GraphStore + ?Sized>(
    source: &str,
    store: &mut S,
) -> Result<Vec<QueryStatement>, VortexError> {
    let program = parse(source)?;
    let queries = register_program(store, program)?;
    Ok(queries)
}

/// Build the record for a stored vertex from its stored schema.
pub fn instantiate<S: GraphStore + ?Sized>(
    store: &S,
    vertex: &str,
) -> Result<Record, VortexError> {
    let vertex = store.read_vertex(vertex)?;
    let schema = store.read_schema(&vertex.schema)?;
    Ok(Record::from_vertex(schema, vertex)?)
}

// ============ Errors ============

#[derive(Error, Debug)]
pub enum VortexError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Value error: {0}")]
    Value(#[from] ValueError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
