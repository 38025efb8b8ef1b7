//! Table and database data structures.
//!
//! A database is a set of named tables; a table is an ordered sequence of
//! JSON records sharing one set of column names. Row order is significant:
//! conditions and multi-table merges are resolved by position.

use crate::types::{QueryError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Single row: column name to scalar value, in source column order.
pub type Record = Map<String, Value>;

/// Projected output row keyed by `table.column`.
pub type ResultRow = Map<String, Value>;

/// Ordered sequence of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    /// Create a table from records.
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.rows.get(index)
    }

    /// All records in order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Column names inferred from the first record.
    ///
    /// # Returns
    ///
    /// `None` for an empty table (nothing to infer from)
    pub fn schema(&self) -> Option<Vec<&str>> {
        self.rows
            .first()
            .map(|first| first.keys().map(String::as_str).collect())
    }

    /// Check whether `column` is part of the inferred schema.
    ///
    /// # Returns
    ///
    /// `None` for an empty table, otherwise whether record 0 has the column
    pub fn has_column(&self, column: &str) -> Option<bool> {
        self.rows.first().map(|first| first.contains_key(column))
    }
}

impl From<Vec<Record>> for Table {
    fn from(rows: Vec<Record>) -> Self {
        Self::new(rows)
    }
}

/// Named tables, immutable for the lifetime of an engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database {
    tables: BTreeMap<String, Table>,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table, builder style.
    pub fn with_table(mut self, name: impl Into<String>, table: impl Into<Table>) -> Self {
        self.tables.insert(name.into(), table.into());
        self
    }

    /// Build a database from a JSON document of the form
    /// `{ "table": [ { "column": value, ... }, ... ], ... }`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Schema` if the root is not an object, a table is
    /// not an array, or a row is not an object
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(QueryError::Schema(
                "database document must be an object of tables".to_string(),
            ));
        };

        let mut tables = BTreeMap::new();
        for (name, table) in root {
            let Value::Array(items) = table else {
                return Err(QueryError::Schema(format!(
                    "table '{}' must be an array of records",
                    name
                )));
            };

            let mut rows = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(record) => rows.push(record),
                    other => {
                        return Err(QueryError::Schema(format!(
                            "row {} of table '{}' is not an object: {}",
                            index, name, other
                        )))
                    }
                }
            }
            tables.insert(name, Table::new(rows));
        }

        Ok(Self { tables })
    }

    /// Load a database from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let value: Value = serde_json::from_str(&content)?;
        let db = Self::from_value(value)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            tables = db.tables.len(),
            "Loaded database"
        );
        Ok(db)
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Check whether a table exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Iterate tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }
}
