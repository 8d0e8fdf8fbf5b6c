//! Execution report core: load, normalize, deduplicate, summarize.
//!
//! The pipeline is a chain of pure functions over owned tables:
//!
//! ```text
//! RawReport --normalize--> CleanedReport --find_duplicates--> duplicates
//!                               |                                 |
//!                               +--summarize--> DuplicateSummary  +--select_latest
//!                               |                                 |
//!                               +------- unique rows  +  latest rows --> final set
//! ```
//!
//! [`Analysis`] runs the whole chain once and holds the results for a
//! session. Nothing here keeps process-wide state.

pub mod columns;
pub mod duplicates;
mod error;
pub mod latest;
mod load;
pub mod normalize;
mod record;
pub mod stats;

use std::path::Path;

use tracing::info;

pub use columns::{Column, ColumnNames};
pub use duplicates::{DuplicateSummary, SummaryRow, find_duplicates, summarize};
pub use error::ReportError;
pub use latest::{final_analysis_set, select_latest};
pub use load::RawReport;
pub use normalize::{Normalizer, normalize};
pub use record::{CleanedRecord, CleanedReport, TableView, format_hms};

/// Results of running the full pipeline over one report.
#[derive(Debug, Clone)]
pub struct Analysis {
    cleaned: CleanedReport,
    duplicates: CleanedReport,
    summary: DuplicateSummary,
    repeated_summary: DuplicateSummary,
    final_set: CleanedReport,
}

impl Analysis {
    /// Normalize `raw` and analyze the cleaned table.
    pub fn build(raw: &RawReport, normalizer: &Normalizer) -> Result<Self, ReportError> {
        let cleaned = normalizer.normalize(raw)?;
        Ok(Self::from_cleaned(cleaned))
    }

    /// Read, normalize and analyze a CSV file.
    pub fn from_path(path: &Path, normalizer: &Normalizer) -> Result<Self, ReportError> {
        let raw = RawReport::from_path(path)?;
        Self::build(&raw, normalizer)
    }

    /// Analyze an already cleaned table, keyed by process name.
    pub fn from_cleaned(cleaned: CleanedReport) -> Self {
        let duplicates = find_duplicates(&cleaned);
        let summary = summarize(&cleaned, Column::ProcessName);
        let repeated_summary = summarize(&duplicates, Column::ProcessName);
        let final_set = final_analysis_set(&cleaned);

        info!(
            rows = cleaned.len(),
            duplicates = duplicates.len(),
            final_rows = final_set.len(),
            "report analyzed"
        );

        Self {
            cleaned,
            duplicates,
            summary,
            repeated_summary,
            final_set,
        }
    }

    /// Every cleaned row.
    pub fn cleaned(&self) -> &CleanedReport {
        &self.cleaned
    }

    /// Every occurrence of every repeated test case.
    pub fn duplicates(&self) -> &CleanedReport {
        &self.duplicates
    }

    /// Buckets and summary over all cleaned rows.
    pub fn summary(&self) -> &DuplicateSummary {
        &self.summary
    }

    /// Buckets and summary over the repeated rows only.
    pub fn repeated_summary(&self) -> &DuplicateSummary {
        &self.repeated_summary
    }

    /// One row per test case, latest occurrence for repeats.
    pub fn final_set(&self) -> &CleanedReport {
        &self.final_set
    }

    /// Test cases executed exactly once.
    pub fn first_run_count(&self) -> usize {
        self.summary.bucket(1).map_or(0, CleanedReport::len)
    }
}
