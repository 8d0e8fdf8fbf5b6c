//! Column naming for raw and cleaned execution reports.
//!
//! Raw column names come from the exporting tool and are configurable via
//! the `[columns]` config section. Cleaned column names are fixed display
//! names used by every consumer of the cleaned table.

use serde::{Deserialize, Serialize};

/// Display name of the deduplication key column.
pub const PROCESS_NAME: &str = "Process Name";
pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const ELAPSED_TIME: &str = "Elapsed Time";
pub const EXECUTION_DATE: &str = "Execution Date";
pub const STATUS: &str = "Status";

// ---------------------------------------------------------------------------
// Raw column names
// ---------------------------------------------------------------------------

/// Names of the columns in the raw CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Free-text batch title carrying the execution date.
    pub title: String,
    /// Test case / process name (required).
    pub process_name: String,
    pub start_time: String,
    pub end_time: String,
    /// Elapsed time in seconds (required).
    pub elapsed_time: String,
    /// Pass/fail status, passed through unchanged.
    pub status: String,
    /// Audit columns dropped during normalization.
    pub audit: Vec<String>,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            process_name: "StartingProcessName".to_string(),
            start_time: "StartTime".to_string(),
            end_time: "EndTime".to_string(),
            elapsed_time: "ElapsedTime".to_string(),
            status: "Status".to_string(),
            audit: default_audit_columns(),
        }
    }
}

fn default_audit_columns() -> Vec<String> {
    ["CreatedBy", "ModifiedBy", "CreatedDate", "ModifiedDate"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Cleaned columns
// ---------------------------------------------------------------------------

/// A column of a cleaned report.
///
/// `Extra(i)` refers to the i-th passthrough column of the report that owns
/// it (see [`CleanedReport::extra_names`](super::CleanedReport::extra_names)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ProcessName,
    StartTime,
    EndTime,
    ElapsedTime,
    ExecutionDate,
    Status,
    Extra(usize),
}

impl Column {
    /// Display name for the fixed columns; `None` for passthrough columns.
    pub fn display_name(self) -> Option<&'static str> {
        match self {
            Self::ProcessName => Some(PROCESS_NAME),
            Self::StartTime => Some(START_TIME),
            Self::EndTime => Some(END_TIME),
            Self::ElapsedTime => Some(ELAPSED_TIME),
            Self::ExecutionDate => Some(EXECUTION_DATE),
            Self::Status => Some(STATUS),
            Self::Extra(_) => None,
        }
    }

    /// Resolve a fixed display name, ignoring ASCII case.
    pub fn from_display_name(name: &str) -> Option<Self> {
        [
            Self::ProcessName,
            Self::StartTime,
            Self::EndTime,
            Self::ElapsedTime,
            Self::ExecutionDate,
            Self::Status,
        ]
        .into_iter()
        .find(|c| {
            c.display_name()
                .is_some_and(|d| d.eq_ignore_ascii_case(name.trim()))
        })
    }
}
