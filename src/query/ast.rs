//! Parsed query structures.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Parsed `SELECT ... FROM ... [WHERE ...]` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    /// Requested columns as written, expected in `table.column` form
    pub columns: Vec<String>,
    /// Tables listed in FROM, in order
    pub tables: Vec<String>,
    /// Optional single comparison
    pub condition: Option<Condition>,
}

/// Single comparison clause: `left_table.left_column <op> right`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub left_table: String,
    pub left_column: String,
    pub operator: Operator,
    pub right: Operand,
}

impl Condition {
    /// Table of the right operand, when it is a column reference.
    pub fn right_table(&self) -> Option<&str> {
        match &self.right {
            Operand::Column { table, .. } => Some(table),
            Operand::Literal(_) => None,
        }
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Another table's column, read at the same row index
    Column { table: String, column: String },
    /// Number or (unquoted) string literal
    Literal(Value),
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
}

impl Operator {
    /// SQL spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    /// Whether `left <op> right` holds given their ordering.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Gt => ordering == Ordering::Greater,
            Self::Le => ordering != Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
