//! Table scanning and projection.

use crate::otel;
use crate::query::predicates::Predicate;
use crate::schema::ColumnMap;
use crate::types::{Record, ResultRow, Table};

/// Scan `table`, keep rows whose index satisfies `predicate`, and project
/// the columns requested for it as `table.column` keys.
///
/// Output follows table order; rows are neither reordered nor deduplicated.
pub fn scan(
    table_name: &str,
    table: &Table,
    columns: &ColumnMap,
    predicate: &Predicate<'_>,
) -> Vec<ResultRow> {
    scan_indexed(table_name, table, columns, predicate)
        .into_iter()
        .map(|(_, row)| row)
        .collect()
}

/// Like [`scan`], but pairs each row with its source index.
///
/// A predicate that runs past the end of a referenced table rejects the
/// row instead of failing the scan.
pub fn scan_indexed(
    table_name: &str,
    table: &Table,
    columns: &ColumnMap,
    predicate: &Predicate<'_>,
) -> Vec<(usize, ResultRow)> {
    let span = otel::scan_span(table_name);
    let _guard = span.enter();

    let projection = columns.columns(table_name).unwrap_or_default();

    let rows: Vec<(usize, ResultRow)> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(index, _)| match predicate.evaluate(*index) {
            Ok(keep) => keep,
            Err(err) => {
                tracing::trace!(index = *index, error = %err, "Row treated as non-matching");
                false
            }
        })
        .map(|(index, record)| (index, project(table_name, record, projection)))
        .collect();

    otel::record_query_metrics(rows.len());
    rows
}

/// Select `columns` from `record`, keyed `table.column`.
///
/// Columns missing from this particular record are skipped.
pub fn project(table_name: &str, record: &Record, columns: &[String]) -> ResultRow {
    columns
        .iter()
        .filter_map(|column| {
            record
                .get(column)
                .map(|value| (format!("{}.{}", table_name, column), value.clone()))
        })
        .collect()
}
