//! Schema validation.
//!
//! Schemas are never declared: each table's columns are inferred from its
//! first record. Validation ties every requested `table.column` to a table
//! listed in FROM and builds the per-table projection list.

pub mod associator;

pub use associator::{associate, ColumnMap};
