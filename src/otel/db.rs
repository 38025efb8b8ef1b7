//! Query and scan spans.

use tracing::field::Empty;
use tracing::{span, Level, Span};

/// System name reported in `db.system.name`.
pub const DB_SYSTEM: &str = "memory";

/// Operation types (maps to `db.operation.name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOperation {
    /// Full SELECT execution
    Select,
    /// Single pass over one table
    Scan,
}

impl DbOperation {
    /// Get operation name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Scan => "scan",
        }
    }
}

/// Create a span covering one `execute` call.
///
/// # Example
///
/// ```rust,ignore
/// let span = query_span("SELECT employees.name FROM employees");
/// let _guard = span.enter();
/// ```
pub fn query_span(query_text: &str) -> Span {
    span!(
        Level::DEBUG,
        "db.query",
        otel.name = DbOperation::Select.as_str(),
        otel.kind = "internal",
        db.system.name = DB_SYSTEM,
        db.operation.name = DbOperation::Select.as_str(),
        db.query.text = query_text,
        db.response.returned_rows = Empty,
    )
}

/// Create a span covering one table scan.
pub fn scan_span(table: &str) -> Span {
    span!(
        Level::TRACE,
        "db.scan",
        otel.name = %format!("{} {}", DbOperation::Scan.as_str(), table),
        otel.kind = "internal",
        db.system.name = DB_SYSTEM,
        db.operation.name = DbOperation::Scan.as_str(),
        db.collection.name = table,
        db.response.returned_rows = Empty,
    )
}

/// Record the number of rows produced on the current span.
pub fn record_query_metrics(rows_returned: usize) {
    Span::current().record("db.response.returned_rows", rows_returned);
}
