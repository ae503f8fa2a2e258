//! Pipe table rows and table assembly.

use crate::node::ContentNode;

/// Check whether a line can open a pipe table.
///
/// After trimming, the line must start and end with `|` and contain at
/// least one interior `|`.
#[must_use]
pub fn is_table_row(line: &str) -> bool {
    is_table_continuation(line) && {
        let trimmed = line.trim();
        trimmed[1..trimmed.len() - 1].contains('|')
    }
}

/// Check whether a line continues an open table.
///
/// Only the outer pipes are required, so single-cell rows such as `| 1 |`
/// stay in the table.
#[must_use]
pub fn is_table_continuation(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Split a table row into trimmed cells.
///
/// The outer pipes are removed; `| a | b |` yields `["a", "b"]`.
#[must_use]
pub fn split_table_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_owned()).collect()
}

/// Check whether every cell is alignment punctuation (`---`, `:--`, `:-:`, `--:`).
#[must_use]
pub fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|cell| is_alignment_cell(cell))
}

fn is_alignment_cell(cell: &str) -> bool {
    let dashes = cell.strip_prefix(':').unwrap_or(cell);
    let dashes = dashes.strip_suffix(':').unwrap_or(dashes);
    !dashes.is_empty() && dashes.chars().all(|c| c == '-')
}

/// Build a table node from buffered rows.
///
/// The first row is the header and the second row (the alignment row) is
/// discarded. Short rows are kept as they are.
#[must_use]
pub fn build_table(rows: Vec<Vec<String>>) -> ContentNode {
    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();

    if let Some(separator) = rows.next()
        && !is_separator_row(&separator)
    {
        tracing::debug!(
            cells = ?separator,
            "Second table row is not an alignment row, discarding it anyway"
        );
    }

    ContentNode::Table {
        header,
        rows: rows.collect(),
    }
}
