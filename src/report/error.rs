use std::path::PathBuf;

use thiserror::Error;

/// Structural failures while loading or normalizing a report.
///
/// Per-row anomalies (bad timestamps, non-numeric elapsed times, malformed
/// titles) are never errors; they degrade the affected cell to unknown.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("required column `{column}` is missing from the report")]
    MissingColumn { column: String },

    #[error("failed to read report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportError {
    pub(crate) fn missing(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }
}
