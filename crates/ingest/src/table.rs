//! Untyped delimited table with a header row, as read from a source.

use pulse_core::{PulseError, PulseResult};
use std::io::Read;
use std::path::Path;

/// A data row together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<String>,
}

/// Header + rows of string cells. Rows may be shorter than the header;
/// missing trailing cells read as blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Build a table from literal cells, numbering rows as if read from a
    /// file whose header sits on line 1.
    pub fn from_cells<H, R, C>(name: &str, headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let headers = headers.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| RawRow {
                line: i + 2,
                cells: cells.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self::new(name, headers, rows)
    }

    /// Parse comma-delimited text with a header row. Cell values are trimmed;
    /// header names are kept verbatim for `normalize_columns`.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> PulseResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Fields)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 2);
            // Blank lines inside the file carry no observation.
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(RawRow {
                line,
                cells: record.iter().map(str::to_string).collect(),
            });
        }

        Ok(Self::new(name, headers, rows))
    }

    pub fn from_path(name: &str, path: impl AsRef<Path>) -> PulseResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(name, file)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Index of a column that must be present, or a schema error naming
    /// this table and the column.
    pub fn require_column(&self, column: &str) -> PulseResult<usize> {
        self.column_index(column)
            .ok_or_else(|| PulseError::schema(&self.name, column))
    }

    pub(crate) fn with_headers(&self, headers: Vec<String>) -> Self {
        Self {
            name: self.name.clone(),
            headers,
            rows: self.rows.clone(),
        }
    }

    pub(crate) fn into_parts(self) -> (String, Vec<String>, Vec<RawRow>) {
        (self.name, self.headers, self.rows)
    }
}

impl RawRow {
    /// Cell at `index`, blank when the row is short.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}
