//! CLI command implementations for sfs-report.
//!
//! Provides subcommand handlers for:
//! - `sfs-report summary`: KPIs, execution health, status distribution
//! - `sfs-report duplicates`: duplicate summary or one execution-count bucket
//! - `sfs-report slowest`: top-N slowest test cases in the final set
//! - `sfs-report clean`: the cleaned (or final) table
//! - `sfs-report serve`: the web dashboard
//! - `sfs-report config show|init|set|reset`: configuration management

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde::Serialize;

use crate::config::{self, schema::ReportConfig};
use crate::report::stats::{self, Health, Kpis, SlowEntry, StatusCount, StatusFilter};
use crate::report::{Analysis, CleanedReport, DuplicateSummary, SummaryRow, TableView};
use crate::report::{duplicates, summarize};
use crate::web::{self, Dashboard};

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Widest a cell is allowed to get in table output.
const MAX_CELL_WIDTH: usize = 32;

// ---------------------------------------------------------------------------
// sfs-report summary
// ---------------------------------------------------------------------------

/// Show KPIs and the status distribution of the final analysis set.
pub fn run_summary(analysis: &Analysis, config: &ReportConfig, format: OutputFormat) -> Result<()> {
    if analysis.cleaned().is_empty() {
        println!("{}", "The report has no rows.".yellow());
        return Ok(());
    }

    let kpis = stats::compute_kpis(analysis, config.dashboard.health_thresholds());
    let dist = stats::status_distribution(analysis.final_set());

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "kpis": kpis,
                "status_distribution": dist,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => print_summary_csv(&kpis, &dist)?,
        OutputFormat::Table => print_summary_table(&kpis, &dist),
    }

    Ok(())
}

fn print_summary_table(kpis: &Kpis, dist: &[StatusCount]) {
    println!("{}", "Execution Report Summary".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    println!("  {} {}", "Total test cases:".bold(), format_number(kpis.total));
    println!(
        "  {} {}",
        "Passed:          ".bold(),
        format_number(kpis.passed).green()
    );
    println!(
        "  {} {}",
        "Failed:          ".bold(),
        format_number(kpis.failed).red()
    );
    if kpis.other > 0 {
        println!("  {} {}", "Other:           ".bold(), format_number(kpis.other));
    }
    println!("  {} {:.2}%", "Pass rate:       ".bold(), kpis.pass_pct);
    println!("  {} {}", "Total time:      ".bold(), kpis.total_elapsed);
    println!("  {} {}", "First run:       ".bold(), format_number(kpis.first_run));
    println!("  {} {}", "Repeated:        ".bold(), format_number(kpis.repeated));
    println!();
    println!("  {} {}", "Execution health:".bold(), colorize_health(kpis.health));
    println!();

    if !dist.is_empty() {
        println!("{}", "Status Distribution".bold().cyan());
        let max = dist.iter().map(|d| d.count).max().unwrap_or(1).max(1);
        for entry in dist {
            let width = entry.count * 30 / max;
            println!(
                "  {:<16} {:>8} {}",
                truncate(&entry.status, 16),
                format_number(entry.count),
                "#".repeat(width.max(1)).dimmed(),
            );
        }
    }
}

fn print_summary_csv(kpis: &Kpis, dist: &[StatusCount]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout().lock());
    wtr.write_record(["metric", "value"])?;
    let rows = [
        ("total", kpis.total.to_string()),
        ("passed", kpis.passed.to_string()),
        ("failed", kpis.failed.to_string()),
        ("other", kpis.other.to_string()),
        ("pass_pct", format!("{:.2}", kpis.pass_pct)),
        ("total_elapsed_seconds", kpis.total_elapsed_seconds.to_string()),
        ("first_run", kpis.first_run.to_string()),
        ("repeated", kpis.repeated.to_string()),
        ("health", kpis.health.to_string()),
    ];
    for (metric, value) in rows {
        wtr.write_record([metric, value.as_str()])?;
    }
    for entry in dist {
        wtr.write_record([format!("status:{}", entry.status), entry.count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn colorize_health(health: Health) -> colored::ColoredString {
    let label = health.to_string();
    match health {
        Health::Good => label.green().bold(),
        Health::Moderate => label.yellow().bold(),
        Health::Poor => label.red().bold(),
    }
}

// ---------------------------------------------------------------------------
// sfs-report duplicates
// ---------------------------------------------------------------------------

/// Options for `sfs-report duplicates`.
#[derive(Debug, Clone, Default)]
pub struct DuplicatesArgs {
    /// Show the rows executed exactly this many times instead of the summary.
    pub count: Option<usize>,
    /// Restrict to test cases executed more than once.
    pub repeated_only: bool,
    /// Group by this column instead of the process name.
    pub key: Option<String>,
}

/// Show the duplicate summary, or the rows of one bucket.
pub fn run_duplicates(analysis: &Analysis, args: &DuplicatesArgs, format: OutputFormat) -> Result<()> {
    let summary = duplicate_summary(analysis, args)?;

    match args.count {
        Some(count) => match summary.bucket(count) {
            Some(rows) => print_report(rows, format),
            None => {
                let range = summary
                    .count_range()
                    .map(|(min, max)| format!(" (available: {min}..={max})"))
                    .unwrap_or_default();
                println!(
                    "{}",
                    format!("No test cases were executed exactly {count} time(s){range}.").yellow()
                );
                Ok(())
            }
        },
        None => print_duplicate_summary(&summary, format),
    }
}

/// Resolve which summary the arguments ask for. The process-name summaries
/// are precomputed; any other key is summarized on demand.
fn duplicate_summary(analysis: &Analysis, args: &DuplicatesArgs) -> Result<DuplicateSummary> {
    let Some(name) = args.key.as_deref() else {
        return Ok(if args.repeated_only {
            analysis.repeated_summary().clone()
        } else {
            analysis.summary().clone()
        });
    };

    let cleaned = analysis.cleaned();
    let Some(key) = cleaned.column(name) else {
        bail!(
            "unknown column `{name}` (available: {})",
            cleaned.column_names().join(", ")
        );
    };

    Ok(if args.repeated_only {
        summarize(&duplicates::find_duplicates_by(cleaned, key), key)
    } else {
        summarize(cleaned, key)
    })
}

fn print_duplicate_summary(summary: &DuplicateSummary, format: OutputFormat) -> Result<()> {
    if summary.is_empty() {
        println!("{}", "No duplicate test cases.".green());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary.summary())?),
        OutputFormat::Csv => print_csv(summary.summary())?,
        OutputFormat::Table => print_summary_rows(summary.summary()),
    }
    Ok(())
}

fn print_summary_rows(rows: &[SummaryRow]) {
    println!("{}", "Duplicate Summary".bold().cyan());
    println!("{}", "=".repeat(44));
    println!(
        "  {:>15} {:>12} {:>12}",
        "Duplicate Count", "Rows", "Test Cases"
    );
    println!("  {}", "-".repeat(42));
    for (i, row) in rows.iter().enumerate() {
        let line = format!(
            "  {:>15} {:>12} {:>12}",
            row.duplicate_count,
            format_number(row.rows),
            format_number(row.test_cases),
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// sfs-report slowest
// ---------------------------------------------------------------------------

/// Options for `sfs-report slowest`.
#[derive(Debug, Clone, Default)]
pub struct SlowestArgs {
    pub top: Option<usize>,
    /// Comma-separated statuses, e.g. `passed,failed`.
    pub status: Option<String>,
    pub min_seconds: Option<i64>,
}

/// Show the slowest test cases of the final analysis set.
pub fn run_slowest(
    analysis: &Analysis,
    config: &ReportConfig,
    args: &SlowestArgs,
    format: OutputFormat,
) -> Result<()> {
    let entries = slowest_entries(analysis, config, args);

    if entries.is_empty() {
        println!("{}", "No test cases match the given filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Csv => print_csv(&entries)?,
        OutputFormat::Table => print_slowest_table(&entries),
    }
    Ok(())
}

fn slowest_entries(analysis: &Analysis, config: &ReportConfig, args: &SlowestArgs) -> Vec<SlowEntry> {
    let top = config.dashboard.clamp_top_n(args.top);
    let filter = args
        .status
        .as_deref()
        .map(StatusFilter::parse_list)
        .unwrap_or_default();

    match args.min_seconds {
        Some(min) => {
            let pool = stats::filter_by_min_elapsed(analysis.final_set(), min);
            stats::slowest(&pool, &filter, top)
        }
        None => stats::slowest(analysis.final_set(), &filter, top),
    }
}

fn print_slowest_table(entries: &[SlowEntry]) {
    println!(
        "{}",
        format!("Top {} Slowest Test Cases", entries.len()).bold().cyan()
    );
    println!("{}", "=".repeat(70));
    println!(
        "  {:<32} {:<10} {:>10}  Duration",
        "Test Case", "Status", "Elapsed"
    );
    println!("  {}", "-".repeat(68));

    for (i, entry) in entries.iter().enumerate() {
        let line = format!(
            "  {:<32} {:<10} {:>10}  {}",
            truncate(&entry.process_name, 32),
            truncate(&entry.status, 10),
            entry.elapsed,
            entry.elapsed_human,
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// sfs-report clean
// ---------------------------------------------------------------------------

/// Print the cleaned table, or the final analysis set with `final_only`.
pub fn run_clean(analysis: &Analysis, final_only: bool, format: OutputFormat) -> Result<()> {
    let report = if final_only {
        analysis.final_set()
    } else {
        analysis.cleaned()
    };
    print_report(report, format)
}

// ---------------------------------------------------------------------------
// sfs-report serve
// ---------------------------------------------------------------------------

/// Load the report and run the dashboard until interrupted.
pub fn run_serve(source: &Path, config: &ReportConfig, addr: Option<&str>, no_open: bool) -> Result<()> {
    let addr = addr.unwrap_or(&config.dashboard.addr).to_string();
    let dashboard = Dashboard::load(source, config.normalizer(), config.dashboard.clone())?;
    let open = config.dashboard.open_browser && !no_open;
    web::serve(&addr, dashboard, open)
}

// ---------------------------------------------------------------------------
// sfs-report config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective sfs-report Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file().is_some_and(|p| p.exists());
    let project_exists = config::project_config_file().is_some_and(|p| p.exists());
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.sfs-report/config.toml", global_exists);
    print_source(".sfs-report.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "SFS_REPORT_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.sfs-report/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    println!(
        "  {}",
        "Edit the file to match your report's column names.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Table output
// ---------------------------------------------------------------------------

/// Print a report in the requested format.
fn print_report(report: &CleanedReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.to_view())?),
        OutputFormat::Csv => report
            .write_csv(std::io::stdout().lock())
            .context("failed to write CSV")?,
        OutputFormat::Table => print_view(&report.to_view()),
    }
    Ok(())
}

/// Print serializable rows as CSV with a header.
fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout().lock());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_view(view: &TableView) {
    for line in render_view(view) {
        println!("{line}");
    }
    println!();
    println!("  {}", format!("{} rows", format_number(view.rows.len())).dimmed());
}

/// Lay a table out in fixed-width columns. The second line is the rule under
/// the header.
fn render_view(view: &TableView) -> Vec<String> {
    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            view.rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let format_row = |cells: &[String]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:<w$}", truncate(cell, w))
            })
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    };

    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let mut lines = vec![format_row(&view.columns), format!("  {}", "-".repeat(total))];
    lines.extend(view.rows.iter().map(|r| format_row(r)));
    lines
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
