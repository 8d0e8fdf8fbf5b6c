//! Report normalizer: raw export -> cleaned, typed, renamed table.
//!
//! Steps, in order:
//! 1. drop audit columns (absent ones are ignored)
//! 2. parse start/end timestamps (`%d-%m-%Y %H:%M` by default)
//! 3. parse elapsed seconds into a duration
//! 4. derive the execution date from the title
//! 5. drop the title
//! 6. rename to display names
//! 7. keep only the time of day of start/end
//!
//! Only a missing required column (process name, elapsed time) fails the
//! whole report. Everything else degrades one cell to unknown.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use tracing::debug;

use super::columns::{Column, ColumnNames};
use super::record::{CleanedRecord, CleanedReport};
use super::{RawReport, ReportError};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";
pub const DEFAULT_TITLE_SEPARATOR: &str = " - ";

/// Normalize with the default column names and formats.
pub fn normalize(raw: &RawReport) -> Result<CleanedReport, ReportError> {
    Normalizer::default().normalize(raw)
}

/// Configurable report normalizer.
#[derive(Debug, Clone)]
pub struct Normalizer {
    columns: ColumnNames,
    timestamp_format: String,
    title_separator: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            title_separator: DEFAULT_TITLE_SEPARATOR.to_string(),
        }
    }
}

/// Where each known column sits in the raw header.
struct Schema {
    process_name: usize,
    elapsed_time: usize,
    title: Option<usize>,
    start_time: Option<usize>,
    end_time: Option<usize>,
    status: Option<usize>,
    /// Output layout, in raw column order.
    layout: Vec<Column>,
    /// Raw indices of passthrough columns, aligned with `Column::Extra`.
    extras: Vec<usize>,
    extra_names: Vec<String>,
}

impl Normalizer {
    pub fn new(columns: ColumnNames, timestamp_format: &str, title_separator: &str) -> Self {
        Self {
            columns,
            timestamp_format: timestamp_format.to_string(),
            title_separator: title_separator.to_string(),
        }
    }

    /// Produce a cleaned copy of `raw`. The input is never modified and the
    /// output always has exactly as many rows as the input.
    pub fn normalize(&self, raw: &RawReport) -> Result<CleanedReport, ReportError> {
        let schema = self.resolve(raw)?;
        let mut unknown_cells = 0usize;

        let records: Vec<CleanedRecord> = raw
            .rows()
            .iter()
            .map(|row| {
                let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(String::as_str);

                let start_raw = cell(schema.start_time);
                let end_raw = cell(schema.end_time);
                let elapsed_raw = cell(Some(schema.elapsed_time));

                let start_time = start_raw.and_then(|v| self.parse_time_of_day(v));
                let end_time = end_raw.and_then(|v| self.parse_time_of_day(v));
                let elapsed = elapsed_raw.and_then(parse_elapsed);

                unknown_cells += [
                    (start_raw, start_time.is_some()),
                    (end_raw, end_time.is_some()),
                    (elapsed_raw, elapsed.is_some()),
                ]
                .into_iter()
                .filter(|(raw, parsed)| raw.is_some_and(|v| !v.trim().is_empty()) && !parsed)
                .count();

                CleanedRecord {
                    process_name: verbatim(cell(Some(schema.process_name))),
                    start_time,
                    end_time,
                    elapsed,
                    execution_date: cell(schema.title)
                        .and_then(|t| extract_execution_date(t, &self.title_separator)),
                    status: verbatim(cell(schema.status)),
                    extra: schema.extras.iter().map(|&i| verbatim(cell(Some(i)))).collect(),
                }
            })
            .collect();

        if unknown_cells > 0 {
            debug!(unknown_cells, "unparsable cells degraded to unknown");
        }

        let mut layout = schema.layout;
        layout.push(Column::ExecutionDate);
        Ok(CleanedReport::new(layout, schema.extra_names, records))
    }

    /// Resolve required and optional columns against the raw header.
    fn resolve(&self, raw: &RawReport) -> Result<Schema, ReportError> {
        let names = &self.columns;
        let process_name = raw
            .column_index(&names.process_name)
            .ok_or_else(|| ReportError::missing(&names.process_name))?;
        let elapsed_time = raw
            .column_index(&names.elapsed_time)
            .ok_or_else(|| ReportError::missing(&names.elapsed_time))?;

        let title = raw.column_index(&names.title);
        let start_time = raw.column_index(&names.start_time);
        let end_time = raw.column_index(&names.end_time);
        let status = raw.column_index(&names.status);

        let mut layout = Vec::new();
        let mut extras = Vec::new();
        let mut extra_names = Vec::new();

        for (idx, header) in raw.headers().iter().enumerate() {
            let column = if idx == process_name {
                Column::ProcessName
            } else if idx == elapsed_time {
                Column::ElapsedTime
            } else if Some(idx) == start_time {
                Column::StartTime
            } else if Some(idx) == end_time {
                Column::EndTime
            } else if Some(idx) == status {
                Column::Status
            } else if Some(idx) == title || names.audit.contains(header) {
                continue;
            } else {
                extras.push(idx);
                extra_names.push(header.clone());
                Column::Extra(extras.len() - 1)
            };
            layout.push(column);
        }

        Ok(Schema {
            process_name,
            elapsed_time,
            title,
            start_time,
            end_time,
            status,
            layout,
            extras,
            extra_names,
        })
    }

    fn parse_time_of_day(&self, value: &str) -> Option<NaiveTime> {
        parse_timestamp(value, &self.timestamp_format).map(|ts| ts.time())
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

/// Parse a timestamp with the given `strftime` format.
pub fn parse_timestamp(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), format).ok()
}

/// Parse an elapsed time given in (possibly fractional) seconds.
///
/// Fractions are truncated. Non-numeric, non-finite and negative values are
/// unknown.
pub fn parse_elapsed(value: &str) -> Option<TimeDelta> {
    let secs: f64 = value.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 || secs >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_seconds(secs.trunc() as i64)
}

/// Extract the execution date from a batch title.
///
/// `"Nightly Run - 2024-01-05 Batch1"` -> `"2024-01-05"`: take the second
/// `separator`-delimited segment and drop its last whitespace-delimited
/// token. A segment without inner whitespace is returned whole.
pub fn extract_execution_date(title: &str, separator: &str) -> Option<String> {
    let segment = title.split(separator).nth(1)?;
    let date = match segment.rsplit_once(' ') {
        Some((head, _)) => head,
        None => segment,
    };
    non_empty(Some(date))
}

/// Cell text exactly as provided; blank cells are unknown.
fn verbatim(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_date_from_well_formed_title() {
        assert_eq!(
            extract_execution_date("Nightly Run - 2024-01-05 Batch1", " - ").as_deref(),
            Some("2024-01-05")
        );
    }

    #[test]
    fn execution_date_keeps_segment_without_label() {
        assert_eq!(
            extract_execution_date("Run - 2024-01-05", " - ").as_deref(),
            Some("2024-01-05")
        );
    }

    #[test]
    fn execution_date_uses_second_segment_only() {
        assert_eq!(
            extract_execution_date("A - 05-01-2024 B2 - extra", " - ").as_deref(),
            Some("05-01-2024")
        );
    }

    #[test]
    fn execution_date_missing_for_malformed_title() {
        assert_eq!(extract_execution_date("MalformedTitleNoSeparator", " - "), None);
        assert_eq!(extract_execution_date("", " - "), None);
        assert_eq!(extract_execution_date("Run - ", " - "), None);
    }

    #[test]
    fn elapsed_truncates_fractions() {
        assert_eq!(parse_elapsed("125").map(|d| d.num_seconds()), Some(125));
        assert_eq!(parse_elapsed(" 125.9 ").map(|d| d.num_seconds()), Some(125));
        assert_eq!(parse_elapsed("0").map(|d| d.num_seconds()), Some(0));
    }

    #[test]
    fn elapsed_rejects_garbage() {
        assert_eq!(parse_elapsed(""), None);
        assert_eq!(parse_elapsed("abc"), None);
        assert_eq!(parse_elapsed("NaN"), None);
        assert_eq!(parse_elapsed("inf"), None);
        assert_eq!(parse_elapsed("-5"), None);
    }

    #[test]
    fn timestamp_uses_fixed_format() {
        let ts = parse_timestamp("05-01-2024 10:02", DEFAULT_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(ts.time().format("%H:%M:%S").to_string(), "10:02:00");
        assert!(parse_timestamp("2024-01-05 10:02", DEFAULT_TIMESTAMP_FORMAT).is_none());
        assert!(parse_timestamp("31-02-2024 10:02", DEFAULT_TIMESTAMP_FORMAT).is_none());
        assert!(parse_timestamp("", DEFAULT_TIMESTAMP_FORMAT).is_none());
    }

    #[test]
    fn audit_and_title_columns_are_dropped() {
        let raw = RawReport::new(
            vec![
                "Title".into(),
                "StartingProcessName".into(),
                "CreatedBy".into(),
                "Machine".into(),
                "ElapsedTime".into(),
            ],
            vec![vec![
                "Run - 2024-01-05 B".into(),
                "TC_A".into(),
                "alice".into(),
                "bot-1".into(),
                "61".into(),
            ]],
        );
        let cleaned = normalize(&raw).unwrap();
        assert_eq!(
            cleaned.column_names(),
            ["Process Name", "Machine", "Elapsed Time", "Execution Date"]
        );
        assert_eq!(cleaned.records()[0].elapsed_display(), "0:01:01");
    }

    #[test]
    fn key_and_status_cells_are_kept_verbatim() {
        let raw = RawReport::new(
            vec!["StartingProcessName".into(), "ElapsedTime".into(), "Status".into()],
            vec![
                vec![" TC_A".into(), "1".into(), " Passed ".into()],
                vec!["TC_A".into(), "2".into(), "   ".into()],
            ],
        );
        let cleaned = normalize(&raw).unwrap();
        let records = cleaned.records();
        assert_eq!(records[0].process_name.as_deref(), Some(" TC_A"));
        assert_eq!(records[1].process_name.as_deref(), Some("TC_A"));
        assert_eq!(records[0].status.as_deref(), Some(" Passed "));
        assert_eq!(records[1].status, None);
    }

    #[test]
    fn custom_column_names_are_honoured() {
        let columns = ColumnNames {
            process_name: "Case".into(),
            elapsed_time: "Secs".into(),
            ..ColumnNames::default()
        };
        let normalizer = Normalizer::new(columns, DEFAULT_TIMESTAMP_FORMAT, " | ");
        let raw = RawReport::new(
            vec!["Case".into(), "Secs".into(), "Title".into()],
            vec![vec!["TC_A".into(), "5".into(), "Run | 2024-02-01 x".into()]],
        );
        let cleaned = normalizer.normalize(&raw).unwrap();
        assert_eq!(cleaned.records()[0].execution_date.as_deref(), Some("2024-02-01"));
    }
}
