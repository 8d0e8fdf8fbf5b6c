/// Configuration schema and defaults for sfs-report.
///
/// Defines the TOML-serializable configuration structure with sections
/// `[data]`, `[columns]`, `[parsing]`, `[dashboard]` and `[logging]`.
///
/// Every field has a built-in default matching the standard execution
/// report export. Users only need to set the values they want to override.
use serde::{Deserialize, Serialize};

use crate::report::normalize::{DEFAULT_TIMESTAMP_FORMAT, DEFAULT_TITLE_SEPARATOR};
use crate::report::stats::HealthThresholds;
use crate::report::{ColumnNames, Normalizer};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level sfs-report configuration.
///
/// Maps directly to `~/.sfs-report/config.toml` and `.sfs-report.toml`.
/// All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub data: DataConfig,
    pub columns: ColumnNames,
    pub parsing: ParsingConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

impl ReportConfig {
    /// Normalizer built from the `[columns]` and `[parsing]` sections.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(
            self.columns.clone(),
            &self.parsing.timestamp_format,
            &self.parsing.title_separator,
        )
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Input data location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the execution report CSV. Relative paths resolve against the
    /// working directory.
    pub csv_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: "data/Execution_Report.csv".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [parsing]
// ---------------------------------------------------------------------------

/// Cell parsing formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// `strftime` format of the start/end time cells.
    pub timestamp_format: String,
    /// Separator between the run name and the date in the title.
    pub title_separator: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            title_separator: DEFAULT_TITLE_SEPARATOR.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Web dashboard and presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listen address for `sfs-report serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
    /// Default size of the slowest-test-cases ranking.
    pub default_top_n: usize,
    /// Upper bound for the ranking size.
    pub max_top_n: usize,
    /// Pass rate (%) at or above which execution health is good.
    pub good_pass_pct: f64,
    /// Pass rate (%) at or above which execution health is moderate.
    pub moderate_pass_pct: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
            default_top_n: 15,
            max_top_n: 300,
            good_pass_pct: 95.0,
            moderate_pass_pct: 85.0,
        }
    }
}

impl DashboardConfig {
    pub fn health_thresholds(&self) -> HealthThresholds {
        HealthThresholds {
            good_pct: self.good_pass_pct,
            moderate_pct: self.moderate_pass_pct,
        }
    }

    /// Clamp a requested ranking size to `1..=max_top_n`.
    pub fn clamp_top_n(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_top_n)
            .clamp(1, self.max_top_n.max(1))
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostic logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive: `"error"`, `"warn"`, `"info"`, `"debug"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl ReportConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `sfs-report config init`.
    pub fn default_toml() -> String {
        r#"# sfs-report Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SFS_REPORT_*)
#   2. Project config (.sfs-report.toml in current directory)
#   3. User global config (~/.sfs-report/config.toml)
#   4. Built-in defaults

[data]
csv_path = "data/Execution_Report.csv"

[columns]
title = "Title"
process_name = "StartingProcessName"   # required
start_time = "StartTime"
end_time = "EndTime"
elapsed_time = "ElapsedTime"           # required, seconds
status = "Status"
audit = ["CreatedBy", "ModifiedBy", "CreatedDate", "ModifiedDate"]

[parsing]
timestamp_format = "%d-%m-%Y %H:%M"
title_separator = " - "

[dashboard]
addr = "127.0.0.1:9747"
open_browser = true
default_top_n = 15
max_top_n = 300
good_pass_pct = 95.0                   # >= good  -> GOOD
moderate_pass_pct = 85.0               # >= moderate -> MODERATE, else POOR

[logging]
level = "info"                         # error | warn | info | debug
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
