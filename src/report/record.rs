//! Cleaned execution records and the table that owns them.

use std::io::Write;

use chrono::{NaiveTime, TimeDelta};
use serde::Serialize;

use super::ReportError;
use super::columns::Column;

/// One cleaned test execution.
///
/// Unknown values (missing cells, parse failures) are `None` and render as
/// empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    pub process_name: Option<String>,
    /// Time of day the execution started; the date part is discarded.
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub elapsed: Option<TimeDelta>,
    /// Date token extracted from the batch title.
    pub execution_date: Option<String>,
    pub status: Option<String>,
    /// Passthrough cells, aligned with [`CleanedReport::extra_names`].
    pub extra: Vec<Option<String>>,
}

impl CleanedRecord {
    /// Elapsed time in whole seconds.
    pub fn elapsed_seconds(&self) -> Option<i64> {
        self.elapsed.map(|d| d.num_seconds())
    }

    /// `H:MM:SS`, or empty when unknown.
    pub fn elapsed_display(&self) -> String {
        self.elapsed_seconds().map(format_hms).unwrap_or_default()
    }

    /// `HH:MM:SS`, or empty when unknown.
    pub fn start_time_display(&self) -> String {
        format_time(self.start_time)
    }

    /// `HH:MM:SS`, or empty when unknown.
    pub fn end_time_display(&self) -> String {
        format_time(self.end_time)
    }
}

/// Render whole seconds as `H:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Cleaned report
// ---------------------------------------------------------------------------

/// A cleaned execution report: column layout plus owned records.
///
/// Every transformation over a report returns a new `CleanedReport` that
/// shares the layout of its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedReport {
    layout: Vec<Column>,
    extra_names: Vec<String>,
    records: Vec<CleanedRecord>,
}

impl CleanedReport {
    pub fn new(layout: Vec<Column>, extra_names: Vec<String>, records: Vec<CleanedRecord>) -> Self {
        Self {
            layout,
            extra_names,
            records,
        }
    }

    /// A report with the same layout and a different set of records.
    pub fn with_records(&self, records: Vec<CleanedRecord>) -> Self {
        Self {
            layout: self.layout.clone(),
            extra_names: self.extra_names.clone(),
            records,
        }
    }

    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CleanedRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Output columns in display order.
    pub fn layout(&self) -> &[Column] {
        &self.layout
    }

    /// Names of the passthrough columns, indexed by `Column::Extra`.
    pub fn extra_names(&self) -> &[String] {
        &self.extra_names
    }

    /// Header text for a column.
    pub fn header(&self, column: Column) -> &str {
        match column {
            Column::Extra(i) => self.extra_names.get(i).map(String::as_str).unwrap_or(""),
            fixed => fixed.display_name().unwrap_or(""),
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.layout.iter().map(|c| self.header(*c)).collect()
    }

    /// Find a column by header text (case-insensitive).
    pub fn column(&self, name: &str) -> Option<Column> {
        let name = name.trim();
        self.layout
            .iter()
            .copied()
            .find(|c| self.header(*c).eq_ignore_ascii_case(name))
            .or_else(|| Column::from_display_name(name))
    }

    /// Display text of a cell.
    pub fn cell(&self, record: &CleanedRecord, column: Column) -> String {
        match column {
            Column::ProcessName => record.process_name.clone().unwrap_or_default(),
            Column::StartTime => record.start_time_display(),
            Column::EndTime => record.end_time_display(),
            Column::ElapsedTime => record.elapsed_display(),
            Column::ExecutionDate => record.execution_date.clone().unwrap_or_default(),
            Column::Status => record.status.clone().unwrap_or_default(),
            Column::Extra(i) => record
                .extra
                .get(i)
                .cloned()
                .flatten()
                .unwrap_or_default(),
        }
    }

    /// Grouping key of a cell. Empty cells share the `None` key.
    pub fn key(&self, record: &CleanedRecord, column: Column) -> Option<String> {
        let text = self.cell(record, column);
        if text.is_empty() { None } else { Some(text) }
    }

    /// All rows rendered as display strings, in layout order.
    pub fn to_view(&self) -> TableView {
        TableView {
            columns: self.column_names().into_iter().map(str::to_string).collect(),
            rows: self
                .records
                .iter()
                .map(|r| self.layout.iter().map(|c| self.cell(r, *c)).collect())
                .collect(),
        }
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.column_names())?;
        for record in &self.records {
            let cells: Vec<String> = self.layout.iter().map(|c| self.cell(record, *c)).collect();
            wtr.write_record(&cells)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// A rendered table: header names and string rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
