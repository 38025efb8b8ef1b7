//! Percolate Query - minimal in-memory SELECT engine.
//!
//! Runs single-clause queries of the shape
//!
//! ```text
//! SELECT t.a[, t.b ...] FROM t[, u] [WHERE t.c <op> (u.d | literal)]
//! ```
//!
//! against a read-only [`Database`] of named tables, each an ordered
//! sequence of JSON records:
//! - Quote-aware normalization (keywords are case-insensitive, literals are not)
//! - Tokenizer + recursive-descent parser for statements and conditions
//! - Schema validation against the first record of each table
//! - Data-driven predicates evaluated by row position
//! - Projection to `table.column` keys, merged across tables by row index
//!
//! # Example
//!
//! ```rust
//! use percolate_query::{Database, QueryEngine};
//! use serde_json::json;
//!
//! let db = Database::from_value(json!({
//!     "employees": [
//!         {"id": 1, "name": "Alice"},
//!         {"id": 2, "name": "Bob"}
//!     ]
//! })).unwrap();
//!
//! let engine = QueryEngine::new(db);
//! let rows = engine.execute("SELECT employees.name FROM employees WHERE employees.id = 2").unwrap();
//! assert_eq!(rows[0]["employees.name"], "Bob");
//! ```

pub mod config;
pub mod otel;
pub mod output;
pub mod query;
pub mod schema;
pub mod types;

// Re-export main types
pub use query::{Condition, Operand, Operator, Predicate, QueryEngine, Statement};
pub use schema::ColumnMap;
pub use types::{Database, QueryError, Record, Result, ResultRow, Table};
