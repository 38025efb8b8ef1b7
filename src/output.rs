//! Result rendering for the command-line tool.

use crate::config::OutputFormat;
use crate::types::{QueryError, Result, ResultRow};
use colored::Colorize;
use serde_json::Value;
use std::io;

/// Render rows in the requested format.
///
/// `color` only affects [`OutputFormat::Table`] headers.
pub fn render(rows: &[ResultRow], format: OutputFormat, color: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => render_csv(rows),
        OutputFormat::Table => Ok(render_table(rows, color)),
    }
}

/// Union of row keys in first-seen order.
pub fn header(rows: &[ResultRow]) -> Vec<&str> {
    let mut keys: Vec<&str> = Vec::new();
    for key in rows.iter().flat_map(|row| row.keys()) {
        if !keys.contains(&key.as_str()) {
            keys.push(key);
        }
    }
    keys
}

/// Cell text: strings unquoted, everything else as JSON.
fn cell(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_csv(rows: &[ResultRow]) -> Result<String> {
    let keys = header(rows);
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !keys.is_empty() {
        writer.write_record(&keys)?;
    }
    for row in rows {
        writer.write_record(keys.iter().map(|key| cell(row.get(*key))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| QueryError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| QueryError::IoError(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn render_table(rows: &[ResultRow], color: bool) -> String {
    let keys = header(rows);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| keys.iter().map(|key| cell(row.get(*key))).collect())
        .collect();

    let widths: Vec<usize> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            cells
                .iter()
                .map(|line| line[i].chars().count())
                .chain(std::iter::once(key.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    if !keys.is_empty() {
        let heading = join_padded(keys.iter().map(|key| key.to_string()), &widths);
        if color {
            out.push_str(&heading.bold().to_string());
        } else {
            out.push_str(&heading);
        }
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
    }
    for line in cells {
        out.push_str(&join_padded(line.into_iter(), &widths));
        out.push('\n');
    }
    out.push_str(&format!(
        "({} row{})",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    ));
    out
}

fn join_padded(items: impl Iterator<Item = String>, widths: &[usize]) -> String {
    items
        .zip(widths)
        .map(|(item, width)| format!("{:<width$}", item, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
