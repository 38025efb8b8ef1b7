//! Query execution engine.

use crate::otel;
use crate::query::ast::Statement;
use crate::query::normalize::normalize;
use crate::query::parser::parse_statement;
use crate::query::predicates::Predicate;
use crate::query::scan::{scan, scan_indexed};
use crate::schema::associate;
use crate::types::{Database, QueryError, Result, ResultRow, Table};

/// SELECT engine over a read-only database.
///
/// Every call is independent: statements, column maps and predicates are
/// built per call and dropped afterwards. The engine holds no mutable
/// state, so `&QueryEngine` can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    database: Database,
}

impl QueryEngine {
    /// Create an engine over `database`.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Trim, normalize and parse query text without touching the database.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidSyntax` for unrecognized queries,
    /// including unterminated quotes
    pub fn parse(text: &str) -> Result<Statement> {
        let normalized = normalize(text.trim()).map_err(|err| match err {
            QueryError::MalformedLiteral(offset) => {
                QueryError::syntax(format!("unterminated quote at byte {}", offset))
            }
            other => other,
        })?;
        parse_statement(&normalized)
    }

    /// Execute a SELECT query.
    ///
    /// # Arguments
    ///
    /// * `text` - Query text, e.g. `SELECT a.x, b.y FROM a, b WHERE a.id = b.id`
    ///
    /// # Returns
    ///
    /// One row per retained record of the first FROM table, in table order.
    /// Columns of further FROM tables are merged in from the record at the
    /// same index; when that table is shorter the row keeps only the
    /// columns it already has.
    ///
    /// # Errors
    ///
    /// - `QueryError::InvalidSyntax` if the query text is not recognized
    /// - `QueryError::UnknownReference` if a table or column does not exist
    /// - `QueryError::EmptyTable` if a column is validated against an empty table
    pub fn execute(&self, text: &str) -> Result<Vec<ResultRow>> {
        let span = otel::query_span(text);
        let _guard = span.enter();

        match self.run(text) {
            Ok(rows) => {
                otel::record_query_metrics(rows.len());
                tracing::debug!(rows = rows.len(), "Query executed");
                Ok(rows)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Query rejected");
                Err(err)
            }
        }
    }

    fn run(&self, text: &str) -> Result<Vec<ResultRow>> {
        let statement = Self::parse(text)?;
        let columns = associate(&self.database, &statement.tables, &statement.columns)?;
        let predicate = Predicate::build(&self.database, statement.condition.as_ref())?;
        tracing::debug!(
            tables = columns.len(),
            filtered = !predicate.is_always(),
            "Query planned"
        );

        let mut tables = columns.tables();
        let first = tables
            .next()
            .ok_or_else(|| QueryError::syntax("FROM lists no tables"))?;

        let mut rows = scan_indexed(first, self.table(first)?, &columns, &predicate);

        for name in tables {
            if columns.columns(name).map_or(true, |requested| requested.is_empty()) {
                continue;
            }

            // Unfiltered, so position in `extra` equals source index.
            let mut extra: Vec<Option<ResultRow>> =
                scan(name, self.table(name)?, &columns, &Predicate::Always)
                    .into_iter()
                    .map(Some)
                    .collect();

            for (index, row) in rows.iter_mut() {
                if let Some(projected) = extra.get_mut(*index).and_then(Option::take) {
                    row.extend(projected);
                }
            }
        }

        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    fn table(&self, name: &str) -> Result<&Table> {
        self.database
            .table(name)
            .ok_or_else(|| QueryError::unknown(format!("table '{}' does not exist", name)))
    }
}

impl From<Database> for QueryEngine {
    fn from(database: Database) -> Self {
        Self::new(database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn engine() -> QueryEngine {
        QueryEngine::new(
            Database::from_value(json!({
                "employees": [
                    {"id": 1, "name": "Alice", "phone": "12345678"},
                    {"id": 2, "name": "Bob", "phone": "87654321"}
                ],
                "monsters": [
                    {"id": 1, "name": "Loch Ness Monster", "home": "Loch Ness, Scotland"},
                    {"id": 6, "name": "Yeti", "home": "Himalaya Mountains"}
                ]
            }))
            .unwrap(),
        )
    }

    fn rows(value: Value) -> Vec<ResultRow> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_normalizes_keywords() {
        let stmt = QueryEngine::parse("  SELECT Employees.Name FROM Employees  ").unwrap();
        assert_eq!(stmt.columns, vec!["employees.name"]);
    }

    #[test]
    fn test_parse_unterminated_quote_is_syntax_error() {
        let err = QueryEngine::parse("SELECT t.a FROM t WHERE t.b = 'x").unwrap_err();
        assert!(matches!(err, QueryError::InvalidSyntax(_)));
    }

    #[test]
    fn test_execute_projection() {
        let result = engine().execute("SELECT employees.name FROM employees").unwrap();
        assert_eq!(
            result,
            rows(json!([{"employees.name": "Alice"}, {"employees.name": "Bob"}]))
        );
    }

    #[test]
    fn test_execute_filter() {
        let result = engine()
            .execute("SELECT employees.id, employees.name FROM employees WHERE employees.id = 1")
            .unwrap();
        assert_eq!(result, rows(json!([{"employees.id": 1, "employees.name": "Alice"}])));
    }

    #[test]
    fn test_execute_merges_second_table_by_position() {
        let result = engine()
            .execute("SELECT employees.name, monsters.name FROM employees, monsters")
            .unwrap();
        assert_eq!(
            result,
            rows(json!([
                {"employees.name": "Alice", "monsters.name": "Loch Ness Monster"},
                {"employees.name": "Bob", "monsters.name": "Yeti"}
            ]))
        );
    }

    #[test]
    fn test_execute_merge_uses_source_index() {
        let result = engine()
            .execute("SELECT employees.name, monsters.home FROM employees, monsters WHERE employees.id = 2")
            .unwrap();
        assert_eq!(
            result,
            rows(json!([{"employees.name": "Bob", "monsters.home": "Himalaya Mountains"}]))
        );
    }

    #[test]
    fn test_condition_table_outside_from() {
        let result = engine()
            .execute("SELECT monsters.name, monsters.home FROM monsters WHERE monsters.id = employees.id")
            .unwrap();
        assert_eq!(
            result,
            rows(json!([{"monsters.name": "Loch Ness Monster", "monsters.home": "Loch Ness, Scotland"}]))
        );
    }

    #[test]
    fn test_errors_surface_without_rows() {
        let engine = engine();
        assert!(engine.execute("SELECT employees.age FROM employees").unwrap_err().is_reference());
        assert!(engine.execute("FROM employees").unwrap_err().is_syntax());
        assert!(engine
            .execute("SELECT employees.id FROM employees WHERE employees.age = 3")
            .unwrap_err()
            .is_reference());
    }
}
