//! Error types for query processing.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` implementations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

/// Error type for every stage of query processing.
///
/// A failed `execute` call yields exactly one of these and no rows.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Query shape not recognized (missing SELECT/FROM, bad operator, bad operand)
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    /// Quoted literal opened but never closed
    #[error("Malformed literal: unterminated quote at byte {0}")]
    MalformedLiteral(usize),

    /// Table or column absent from the schema, or column not tied to a FROM table
    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    /// Schema inference attempted on a table with zero records
    #[error("Table '{0}' is empty, schema cannot be inferred")]
    EmptyTable(String),

    /// Predicate evaluated past the end of a table
    #[error("Row {index} out of range for table '{table}'")]
    IndexOutOfRange { table: String, index: usize },

    /// Database document does not have the table/record shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML configuration error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl QueryError {
    /// Create a syntax error with context.
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::InvalidSyntax(msg.into())
    }

    /// Create an unknown-reference error with context.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::UnknownReference(msg.into())
    }

    /// Check if error was raised while recognizing the query text.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::InvalidSyntax(_) | Self::MalformedLiteral(_))
    }

    /// Check if error was raised while validating the query against the schema.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::UnknownReference(_) | Self::EmptyTable(_))
    }
}
