//! Table/column association.

use crate::types::{Database, QueryError, Result};
use serde::Serialize;

/// Columns requested from each FROM table, in FROM order.
///
/// Tables that contribute no columns are still present with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnMap {
    entries: Vec<(String, Vec<String>)>,
}

impl ColumnMap {
    /// Requested columns of `table`, in request order.
    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, columns)| columns.as_slice())
    }

    /// Tables in FROM order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains(&self, table: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == table)
    }

    fn push_column(&mut self, table: &str, column: &str) {
        if let Some((_, columns)) = self.entries.iter_mut().find(|(name, _)| name == table) {
            columns.push(column.to_string());
        }
    }
}

/// Validate FROM tables and requested columns against the database.
///
/// # Arguments
///
/// * `db` - Database supplying tables and inferred schemas
/// * `tables` - Tables listed in FROM
/// * `columns` - Requested `table.column` identifiers
///
/// # Errors
///
/// - `QueryError::InvalidSyntax` if a table is listed twice
/// - `QueryError::UnknownReference` if a table does not exist, a column is
///   unqualified, its table is not in FROM, or the column is not in the schema
/// - `QueryError::EmptyTable` if a column is requested from a table with no records
///
/// # Example
///
/// ```rust
/// use percolate_query::{schema::associate, Database};
/// use serde_json::json;
///
/// let db = Database::from_value(json!({"t": [{"a": 1, "b": 2}]})).unwrap();
/// let map = associate(&db, &["t".into()], &["t.b".into(), "t.a".into()]).unwrap();
/// assert_eq!(map.columns("t").unwrap(), ["b", "a"]);
/// ```
pub fn associate(db: &Database, tables: &[String], columns: &[String]) -> Result<ColumnMap> {
    let mut map = ColumnMap::default();

    for table in tables {
        if map.contains(table) {
            return Err(QueryError::syntax(format!(
                "table '{}' is listed more than once in FROM",
                table
            )));
        }
        if !db.has_table(table) {
            return Err(QueryError::unknown(format!("table '{}' does not exist", table)));
        }
        map.entries.push((table.clone(), Vec::new()));
    }

    for requested in columns {
        let (table, column) = requested.split_once('.').ok_or_else(|| {
            QueryError::unknown(format!("column '{}' is not qualified with a table", requested))
        })?;

        if !map.contains(table) {
            return Err(QueryError::unknown(format!(
                "table '{}' of column '{}' is not listed in FROM",
                table, requested
            )));
        }

        let schema = db
            .table(table)
            .ok_or_else(|| QueryError::unknown(format!("table '{}' does not exist", table)))?;
        match schema.has_column(column) {
            None => return Err(QueryError::EmptyTable(table.to_string())),
            Some(false) => {
                return Err(QueryError::unknown(format!(
                    "column '{}' does not exist",
                    requested
                )))
            }
            Some(true) => map.push_column(table, column),
        }
    }

    tracing::debug!(tables = map.len(), columns = columns.len(), "Associated columns");
    Ok(map)
}
