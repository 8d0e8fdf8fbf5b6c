//! Report statistics: KPIs, status distribution, and slowest test cases.
//!
//! Read-only queries over an [`Analysis`]:
//! - **KPIs**: totals, pass rate, total time, execution health
//! - **Status distribution**: counts per status in the final set
//! - **Slowest**: top-N slowest test cases, filtered by status

use std::collections::HashMap;

use serde::Serialize;

use super::Analysis;
use super::record::{CleanedRecord, CleanedReport, format_hms};

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Pass-rate thresholds for the execution health banner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthThresholds {
    pub good_pct: f64,
    pub moderate_pct: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            good_pct: 95.0,
            moderate_pct: 85.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Good,
    Moderate,
    Poor,
}

impl Health {
    pub fn classify(pass_pct: f64, thresholds: HealthThresholds) -> Self {
        if pass_pct >= thresholds.good_pct {
            Self::Good
        } else if pass_pct >= thresholds.moderate_pct {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "GOOD"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::Poor => write!(f, "POOR"),
        }
    }
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline numbers for the brief summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    /// Test cases in the final analysis set.
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub other: usize,
    /// Pass percentage rounded to two decimals.
    pub pass_pct: f64,
    pub total_elapsed_seconds: i64,
    /// `{D}D {H}H {M}M {S}S`
    pub total_elapsed: String,
    /// Test cases executed exactly once.
    pub first_run: usize,
    /// Test cases executed more than once.
    pub repeated: usize,
    pub health: Health,
}

pub fn compute_kpis(analysis: &Analysis, thresholds: HealthThresholds) -> Kpis {
    let final_set = analysis.final_set();
    let total = final_set.len();

    let mut passed = 0;
    let mut failed = 0;
    for record in final_set.records() {
        match status_of(record) {
            Some(s) if s.eq_ignore_ascii_case("passed") => passed += 1,
            Some(s) if s.eq_ignore_ascii_case("failed") => failed += 1,
            _ => {}
        }
    }

    let pass_pct = if total == 0 {
        0.0
    } else {
        round2(passed as f64 / total as f64 * 100.0)
    };

    // Single elapsed values may already be close to i64::MAX.
    let total_elapsed_seconds = final_set
        .records()
        .iter()
        .filter_map(CleanedRecord::elapsed_seconds)
        .fold(0i64, i64::saturating_add);

    Kpis {
        total,
        passed,
        failed,
        other: total - passed - failed,
        pass_pct,
        total_elapsed_seconds,
        total_elapsed: format_total(total_elapsed_seconds),
        first_run: analysis.first_run_count(),
        repeated: analysis
            .repeated_summary()
            .summary()
            .iter()
            .map(|r| r.test_cases)
            .sum(),
        health: Health::classify(pass_pct, thresholds),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn status_of(record: &CleanedRecord) -> Option<&str> {
    record.status.as_deref().map(str::trim)
}

/// Format a total duration as `{D}D {H}H {M}M {S}S`.
pub fn format_total(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    format!(
        "{}D {}H {}M {}S",
        secs / 86_400,
        (secs % 86_400) / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Format a duration for people: `1 hr 2 m 5 sec`. Zero hours and zero
/// minutes are omitted; seconds are always shown.
pub fn format_human(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours} hr"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} m"));
    }
    parts.push(format!("{} sec", secs % 60));
    parts.join(" ")
}

// ---------------------------------------------------------------------------
// Status distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Count rows per status, most common first. Empty statuses are counted as
/// `unknown`.
pub fn status_distribution(report: &CleanedReport) -> Vec<StatusCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in report.records() {
        let status = status_of(record)
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown")
            .to_string();
        *counts.entry(status).or_default() += 1;
    }

    let mut dist: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    dist.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status.cmp(&b.status)));
    dist
}

/// Distinct statuses for a filter picker, lower-cased since
/// [`StatusFilter`] compares case-insensitively. `unknown` is left out
/// because it can never match.
pub fn status_options(dist: &[StatusCount]) -> Vec<String> {
    let mut options: Vec<String> = dist
        .iter()
        .map(|d| d.status.to_ascii_lowercase())
        .filter(|s| s != "unknown")
        .collect();
    options.sort();
    options.dedup();
    options
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Which statuses to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    /// Keep rows whose status matches one of these (case-insensitive).
    /// An empty list keeps nothing.
    Only(Vec<String>),
}

impl StatusFilter {
    /// Parse a comma-separated list such as `passed,failed`.
    pub fn parse_list(list: &str) -> Self {
        Self::Only(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn matches(&self, record: &CleanedRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(allowed) => status_of(record)
                .is_some_and(|s| allowed.iter().any(|a| a.eq_ignore_ascii_case(s))),
        }
    }
}

pub fn filter_by_status(report: &CleanedReport, filter: &StatusFilter) -> CleanedReport {
    report.with_records(
        report
            .records()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect(),
    )
}

/// Rows that took at least `min_seconds`. Unknown elapsed times never match.
pub fn filter_by_min_elapsed(report: &CleanedReport, min_seconds: i64) -> CleanedReport {
    report.with_records(
        report
            .records()
            .iter()
            .filter(|r| r.elapsed_seconds().is_some_and(|s| s >= min_seconds))
            .cloned()
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Slowest
// ---------------------------------------------------------------------------

/// One entry of the slowest-test-cases ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlowEntry {
    pub process_name: String,
    pub status: String,
    pub elapsed_seconds: Option<i64>,
    /// `H:MM:SS`
    pub elapsed: String,
    /// `1 hr 2 m 5 sec`
    pub elapsed_human: String,
}

/// The `top_n` slowest rows of `report` matching `filter`, slowest first.
/// Unknown elapsed times rank last; ties keep input order.
pub fn slowest(report: &CleanedReport, filter: &StatusFilter, top_n: usize) -> Vec<SlowEntry> {
    let mut rows: Vec<&CleanedRecord> = report
        .records()
        .iter()
        .filter(|r| filter.matches(r))
        .collect();
    rows.sort_by(|a, b| match (a.elapsed_seconds(), b.elapsed_seconds()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    rows.into_iter()
        .take(top_n)
        .map(|r| SlowEntry {
            process_name: r.process_name.clone().unwrap_or_default(),
            status: r.status.clone().unwrap_or_default(),
            elapsed_seconds: r.elapsed_seconds(),
            elapsed: r.elapsed_seconds().map(format_hms).unwrap_or_default(),
            elapsed_human: r.elapsed_seconds().map(format_human).unwrap_or_default(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::report::columns::Column;

    fn rec(name: &str, status: &str, secs: Option<i64>) -> CleanedRecord {
        CleanedRecord {
            process_name: Some(name.to_string()),
            start_time: None,
            end_time: None,
            elapsed: secs.and_then(TimeDelta::try_seconds),
            execution_date: Some("2024-01-05".to_string()),
            status: (!status.is_empty()).then(|| status.to_string()),
            extra: Vec::new(),
        }
    }

    fn sample() -> CleanedReport {
        CleanedReport::new(
            vec![Column::ProcessName, Column::Status, Column::ElapsedTime],
            Vec::new(),
            vec![
                rec("a", "passed", Some(30)),
                rec("b", "failed", Some(3700)),
                rec("c", "Passed", None),
                rec("d", "passed", Some(90)),
                rec("e", "", Some(5)),
            ],
        )
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(0), "0D 0H 0M 0S");
        assert_eq!(format_total(125), "0D 0H 2M 5S");
        assert_eq!(format_total(90_061), "1D 1H 1M 1S");
    }

    #[test]
    fn test_total_elapsed_saturates_instead_of_overflowing() {
        let huge = 9_000_000_000_000_000;
        let records = (0..1100)
            .map(|i| rec(&format!("TC_{i}"), "passed", Some(huge)))
            .collect();
        let report = CleanedReport::new(
            vec![Column::ProcessName, Column::Status, Column::ElapsedTime],
            Vec::new(),
            records,
        );
        let kpis = compute_kpis(&Analysis::from_cleaned(report), HealthThresholds::default());
        assert_eq!(kpis.total, 1100);
        assert_eq!(kpis.total_elapsed_seconds, i64::MAX);
        assert_ne!(kpis.total_elapsed, "0D 0H 0M 0S");
    }

    #[test]
    fn test_format_human() {
        assert_eq!(format_human(5), "5 sec");
        assert_eq!(format_human(65), "1 m 5 sec");
        assert_eq!(format_human(3605), "1 hr 5 sec");
        assert_eq!(format_human(3725), "1 hr 2 m 5 sec");
    }

    #[test]
    fn test_health_thresholds() {
        let t = HealthThresholds::default();
        assert_eq!(Health::classify(95.0, t), Health::Good);
        assert_eq!(Health::classify(94.99, t), Health::Moderate);
        assert_eq!(Health::classify(85.0, t), Health::Moderate);
        assert_eq!(Health::classify(10.0, t), Health::Poor);
    }

    #[test]
    fn test_status_distribution() {
        let dist = status_distribution(&sample());
        assert_eq!(dist[0], StatusCount { status: "passed".into(), count: 2 });
        assert_eq!(dist.len(), 4);
        assert!(dist.iter().any(|d| d.status == "unknown"));
    }

    #[test]
    fn test_status_options_fold_case() {
        let options = status_options(&status_distribution(&sample()));
        assert_eq!(options, ["failed", "passed"]);

        let filter = StatusFilter::parse_list(&options[1]);
        assert_eq!(filter_by_status(&sample(), &filter).len(), 3);
    }

    #[test]
    fn test_status_filter() {
        let filter = StatusFilter::parse_list("PASSED, ");
        let kept = filter_by_status(&sample(), &filter);
        assert_eq!(kept.len(), 3);

        let none = filter_by_status(&sample(), &StatusFilter::Only(Vec::new()));
        assert!(none.is_empty());
    }

    #[test]
    fn test_min_elapsed_filter() {
        let kept = filter_by_min_elapsed(&sample(), 30);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_slowest_ranking() {
        let top = slowest(&sample(), &StatusFilter::All, 10);
        let names: Vec<_> = top.iter().map(|e| e.process_name.as_str()).collect();
        assert_eq!(names, ["b", "d", "a", "e", "c"]);
        assert_eq!(top[0].elapsed, "1:01:40");
        assert_eq!(top[0].elapsed_human, "1 hr 1 m 40 sec");
        assert_eq!(top[4].elapsed, "");

        let top2 = slowest(&sample(), &StatusFilter::parse_list("passed"), 2);
        let names: Vec<_> = top2.iter().map(|e| e.process_name.as_str()).collect();
        assert_eq!(names, ["d", "a"]);
    }
}
