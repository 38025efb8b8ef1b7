//! Core data types for the query engine.
//!
//! Defines fundamental types used throughout the system:
//! - `Database`: Named tables, read-only to the engine
//! - `Table`: Ordered sequence of records with an inferred schema
//! - `QueryError`: Error types for all operations
//! - `Result`: Convenient result type alias

pub mod error;
pub mod table;

pub use error::{QueryError, Result};
pub use table::{Database, Record, ResultRow, Table};
