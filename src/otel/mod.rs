//! Tracing instrumentation for query execution.
//!
//! Span attributes follow the OpenTelemetry database semantic conventions:
//! - https://opentelemetry.io/docs/specs/semconv/database/database-spans/
//!
//! **Span naming**:
//! - Query spans: `select` (opened before the text is parsed, so no target)
//! - Scan spans: `scan {table}`, e.g. `scan monsters`
//!
//! **Attributes**:
//! - `db.system.name`: Always `"memory"`
//! - `db.operation.name`: `select` for a query, `scan` for a table pass
//! - `db.collection.name`: Scanned table
//! - `db.query.text`: Query text as received
//! - `db.response.returned_rows`: Rows produced (recorded on completion)
//!
//! Spans are plain `tracing` spans; whichever subscriber the caller installs
//! decides where they go.

pub mod db;

pub use db::{query_span, record_query_metrics, scan_span, DbOperation};
