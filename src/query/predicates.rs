//! Row predicates built from a parsed condition.
//!
//! A predicate is data, not code: it holds the resolved tables and the
//! comparison, and is interpreted against a row index. Both sides of a
//! column-to-column comparison are read at the *same* index, so tables are
//! aligned by position rather than by key.

use crate::query::ast::{Condition, Operand, Operator};
use crate::types::{Database, QueryError, Record, Result, Table};
use serde_json::Value;
use std::cmp::Ordering;

/// Column of a resolved table.
#[derive(Debug, Clone)]
pub struct ColumnRef<'db> {
    table_name: String,
    table: &'db Table,
    column: String,
}

impl<'db> ColumnRef<'db> {
    /// Resolve `table.column` against the database schema.
    ///
    /// # Errors
    ///
    /// - `QueryError::UnknownReference` if the table or column does not exist
    /// - `QueryError::EmptyTable` if the table has no record to infer a schema from
    pub fn resolve(db: &'db Database, table_name: &str, column: &str) -> Result<Self> {
        let table = db.table(table_name).ok_or_else(|| {
            QueryError::unknown(format!("table '{}' does not exist", table_name))
        })?;

        match table.has_column(column) {
            None => Err(QueryError::EmptyTable(table_name.to_string())),
            Some(false) => Err(QueryError::unknown(format!(
                "column '{}.{}' does not exist",
                table_name, column
            ))),
            Some(true) => Ok(Self {
                table_name: table_name.to_string(),
                table,
                column: column.to_string(),
            }),
        }
    }

    fn row(&self, index: usize) -> Result<&'db Record> {
        self.table
            .get(index)
            .ok_or_else(|| QueryError::IndexOutOfRange {
                table: self.table_name.clone(),
                index,
            })
    }

    /// Value at `index`, `Ok(None)` when that record lacks the column.
    fn value(&self, index: usize) -> Result<Option<&'db Value>> {
        Ok(self.row(index)?.get(&self.column))
    }
}

/// Right-hand side of a bound comparison.
#[derive(Debug, Clone)]
pub enum Comparand<'db> {
    Column(ColumnRef<'db>),
    Literal(Value),
}

/// Row-index predicate.
#[derive(Debug, Clone)]
pub enum Predicate<'db> {
    /// No WHERE clause: every row is retained
    Always,
    /// `left <op> right`, both read at the evaluated row index
    Compare {
        left: ColumnRef<'db>,
        operator: Operator,
        right: Comparand<'db>,
    },
}

impl<'db> Predicate<'db> {
    /// Build a predicate for an optional condition.
    ///
    /// Referenced tables need not appear in FROM, but they must exist and
    /// have the referenced columns.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownReference` or `QueryError::EmptyTable`
    /// if a referenced column cannot be resolved
    pub fn build(db: &'db Database, condition: Option<&Condition>) -> Result<Self> {
        let Some(condition) = condition else {
            return Ok(Self::Always);
        };

        let left = ColumnRef::resolve(db, &condition.left_table, &condition.left_column)?;
        let right = match &condition.right {
            Operand::Column { table, column } => {
                Comparand::Column(ColumnRef::resolve(db, table, column)?)
            }
            Operand::Literal(value) => Comparand::Literal(value.clone()),
        };

        Ok(Self::Compare {
            left,
            operator: condition.operator,
            right,
        })
    }

    /// Evaluate against row `index`.
    ///
    /// A record missing a referenced column does not match.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::IndexOutOfRange` if `index` is past the end of
    /// a referenced table
    pub fn evaluate(&self, index: usize) -> Result<bool> {
        match self {
            Self::Always => Ok(true),
            Self::Compare {
                left,
                operator,
                right,
            } => {
                let Some(lhs) = left.value(index)? else {
                    return Ok(false);
                };
                let rhs = match right {
                    Comparand::Column(column) => match column.value(index)? {
                        Some(value) => value,
                        None => return Ok(false),
                    },
                    Comparand::Literal(value) => value,
                };

                Ok(compare_values(lhs, rhs).map_or(false, |ordering| operator.holds(ordering)))
            }
        }
    }

    /// Whether a predicate is a constant `true`.
    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }
}

/// Order two JSON scalars of the same kind.
///
/// # Returns
///
/// `None` when the values are of different kinds (or not scalars), so no
/// operator holds between them
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                Some(a.cmp(&b))
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                Some(a.cmp(&b))
            } else {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::parse_condition;
    use serde_json::json;

    fn db() -> Database {
        Database::from_value(json!({
            "employees": [
                {"id": 1, "name": "Alice", "phone": "12345678"},
                {"id": 2, "name": "Bob", "phone": "87654321"}
            ],
            "monsters": [
                {"id": 1, "name": "Loch Ness Monster", "home": "Loch Ness, Scotland"},
                {"id": 6, "name": "Yeti", "home": "Himalaya Mountains"},
                {"id": 2, "name": "Kraken"}
            ],
            "empty": []
        }))
        .unwrap()
    }

    fn predicate<'db>(db: &'db Database, text: &str) -> Result<Predicate<'db>> {
        let condition = parse_condition(text).unwrap();
        Predicate::build(db, Some(&condition))
    }

    #[test]
    fn test_always() {
        let db = db();
        let pred = Predicate::build(&db, None).unwrap();
        assert!(pred.is_always());
        assert!(pred.evaluate(0).unwrap());
        assert!(pred.evaluate(1000).unwrap());
    }

    #[test]
    fn test_literal_comparisons() {
        let db = db();
        let pred = predicate(&db, "employees.id = 1").unwrap();
        assert!(pred.evaluate(0).unwrap());
        assert!(!pred.evaluate(1).unwrap());

        let pred = predicate(&db, "employees.id >= 2").unwrap();
        assert!(!pred.evaluate(0).unwrap());
        assert!(pred.evaluate(1).unwrap());

        let pred = predicate(&db, "employees.name < 'Bob'").unwrap();
        assert!(pred.evaluate(0).unwrap());
        assert!(!pred.evaluate(1).unwrap());
    }

    #[test]
    fn test_string_comparison_is_case_sensitive() {
        let db = db();
        let pred = predicate(&db, "employees.name = 'alice'").unwrap();
        assert!(!pred.evaluate(0).unwrap());
    }

    #[test]
    fn test_mixed_kinds_never_match() {
        let db = db();
        let pred = predicate(&db, "employees.phone = 12345678").unwrap();
        assert!(!pred.evaluate(0).unwrap());
    }

    #[test]
    fn test_positional_column_comparison() {
        let db = db();
        let pred = predicate(&db, "monsters.id = employees.id").unwrap();
        // Row 0: 1 vs 1; row 1: 6 vs 2.
        assert!(pred.evaluate(0).unwrap());
        assert!(!pred.evaluate(1).unwrap());
        // Row 2 exists in monsters but not in employees.
        assert!(matches!(
            pred.evaluate(2),
            Err(QueryError::IndexOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn test_missing_column_in_record() {
        let db = db();
        let pred = predicate(&db, "monsters.home = 'Atlantis'").unwrap();
        assert!(!pred.evaluate(2).unwrap());
    }

    #[test]
    fn test_out_of_range_left() {
        let db = db();
        let pred = predicate(&db, "employees.id = 1").unwrap();
        assert!(matches!(
            pred.evaluate(2),
            Err(QueryError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_unresolvable_references() {
        let db = db();
        assert!(matches!(
            predicate(&db, "nope.id = 1"),
            Err(QueryError::UnknownReference(_))
        ));
        assert!(matches!(
            predicate(&db, "employees.age = 1"),
            Err(QueryError::UnknownReference(_))
        ));
        assert!(matches!(
            predicate(&db, "employees.id = monsters.age"),
            Err(QueryError::UnknownReference(_))
        ));
        assert!(matches!(
            predicate(&db, "empty.id = 1"),
            Err(QueryError::EmptyTable(_))
        ));
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(&json!(1), &json!(1.0)), Some(Ordering::Equal));
        assert_eq!(compare_values(&json!(-3), &json!(2)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(null), &json!(null)), Some(Ordering::Equal));
        assert_eq!(compare_values(&json!("1"), &json!(1)), None);
        assert_eq!(compare_values(&json!([1]), &json!([1])), None);
    }
}
