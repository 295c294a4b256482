//! CSV encoding with column-set normalization.
//!
//! Encodes an ordered sequence of sparse records into RFC-4180-style CSV.
//! The requested column list may contain a wildcard token that expands to
//! the union of every field observed across all records.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::record::Record;

/// Column-list token requesting inclusion of every observed field.
pub const WILDCARD_COLUMN: &str = "*";

/// Resolve a requested column list against the fields observed in `records`.
///
/// Without a wildcard the requested list is returned verbatim. With one, the
/// wildcard is replaced in place by the deduplicated union of all observed
/// field names in first-observation order (records taken in input order).
/// Names requested explicitly keep their requested position and are never
/// emitted twice; wildcards after the first expand to nothing.
pub fn resolve_columns(requested: &[String], records: &[Record]) -> Vec<String> {
    if !requested.iter().any(|c| c == WILDCARD_COLUMN) {
        return requested.to_vec();
    }

    let explicit: HashSet<&str> = requested
        .iter()
        .filter(|c| *c != WILDCARD_COLUMN)
        .map(String::as_str)
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut union: Vec<String> = Vec::new();
    for record in records {
        for name in record.field_names() {
            if !explicit.contains(name) && seen.insert(name) {
                union.push(name.to_string());
            }
        }
    }

    let mut resolved: Vec<String> = Vec::with_capacity(requested.len() + union.len());
    for column in requested {
        if column == WILDCARD_COLUMN {
            resolved.append(&mut union);
        } else if !resolved.contains(column) {
            resolved.push(column.clone());
        }
    }
    resolved
}

/// Encode `records` into CSV text under the resolved column set.
///
/// The output has one header line plus exactly one line per record, `\n`
/// terminators throughout, and nothing after the final terminator. Cells are
/// quoted only when they contain a comma, a double quote, a line break, or
/// would otherwise be ambiguous (a lone empty field); internal quotes are
/// doubled. Missing fields render as empty cells, array values as their
/// JSON literal.
pub fn encode(records: &[Record], columns: &[String]) -> ExportResult<String> {
    debug!(records = records.len(), "converting records to CSV");

    let columns = resolve_columns(columns, records);

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(&columns)
        .map_err(|e| ExportError::InvalidInput(format!("CSV write error: {e}")))?;

    for record in records {
        let mut row = Vec::with_capacity(columns.len());
        for column in &columns {
            match record.get(column) {
                Some(value) => row.push(value.to_cell()?),
                None => row.push(String::new()),
            }
        }
        writer
            .write_record(&row)
            .map_err(|e| ExportError::InvalidInput(format!("CSV write error: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::InvalidInput(format!("CSV write error: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidInput(format!("CSV write error: {e}")))
}
