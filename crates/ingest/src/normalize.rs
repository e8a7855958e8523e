//! Column-name normalization and channel tagging.

use crate::table::{RawRow, RawTable};
use pulse_core::Channel;

/// Known source spellings mapped to their canonical column name.
const COLUMN_ALIASES: &[(&str, &str)] = &[("impression", "impressions")];

pub const CHANNEL_COLUMN: &str = "channel";

/// Canonical form of a column name: trimmed, lowercased, inner spaces
/// replaced by underscores, then aliased.
pub fn normalize_column_name(name: &str) -> String {
    let canonical = name.trim().to_lowercase().replace(' ', "_");
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == canonical)
        .map(|(_, target)| target.to_string())
        .unwrap_or(canonical)
}

/// Returns a copy of `table` with every header normalized. Idempotent.
pub fn normalize_columns(table: &RawTable) -> RawTable {
    let headers = table
        .headers()
        .iter()
        .map(|h| normalize_column_name(h))
        .collect();
    table.with_headers(headers)
}

/// Returns a copy of `table` with a constant `channel` column. A source
/// column that normalizes to `channel` (e.g. ` Channel`) is overwritten.
pub fn tag_channel(table: &RawTable, channel: Channel) -> RawTable {
    let mut headers = table.headers().to_vec();
    let existing = headers
        .iter()
        .position(|h| normalize_column_name(h) == CHANNEL_COLUMN);
    let index = match existing {
        Some(i) => {
            headers[i] = CHANNEL_COLUMN.to_string();
            i
        }
        None => {
            headers.push(CHANNEL_COLUMN.to_string());
            headers.len() - 1
        }
    };

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut cells = row.cells.clone();
            if cells.len() <= index {
                cells.resize(index + 1, String::new());
            }
            cells[index] = channel.as_str().to_string();
            RawRow {
                line: row.line,
                cells,
            }
        })
        .collect();

    RawTable::new(table.name(), headers, rows)
}
