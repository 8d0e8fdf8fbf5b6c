//! Raw CSV loading.
//!
//! The raw report is kept as untyped strings; all typing happens in the
//! normalizer so that a malformed cell only ever affects its own row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::ReportError;

/// An untyped execution report exactly as exported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReport {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawReport {
    /// Build a report from headers and rows. Rows shorter than the header
    /// are padded with empty cells; longer rows are cut.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| clean_header(h)).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Read a report from CSV data with a header row.
    ///
    /// Cells that are not valid UTF-8 are decoded lossily, so a stray
    /// Latin-1 byte only affects its own cell.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.byte_headers()?.iter().map(decode).collect();

        let mut rows = Vec::new();
        for record in rdr.byte_records() {
            let record = record?;
            rows.push(record.iter().map(decode).collect());
        }

        Ok(Self::new(headers, rows))
    }

    /// Read a report from a CSV file on disk.
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        let file = File::open(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Strip a UTF-8 BOM and surrounding whitespace from a header cell.
fn clean_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_string()
}
