//! Duplicate analyzer: repeated test cases and per-frequency buckets.
//!
//! The frequency of a row is the number of rows in the same table sharing
//! its key. Rows with an empty key cell are grouped together under a single
//! empty key, so the buckets always partition the table.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::columns::Column;
use super::record::CleanedReport;

/// Key frequency of every row, in row order.
pub fn frequencies(report: &CleanedReport, key: Column) -> Vec<usize> {
    let keys: Vec<Option<String>> = report
        .records()
        .iter()
        .map(|r| report.key(r, key))
        .collect();

    let mut counts: HashMap<&Option<String>, usize> = HashMap::new();
    for k in &keys {
        *counts.entry(k).or_default() += 1;
    }

    keys.iter().map(|k| counts[k]).collect()
}

/// Every row whose process name occurs more than once, in input order.
pub fn find_duplicates(report: &CleanedReport) -> CleanedReport {
    find_duplicates_by(report, Column::ProcessName)
}

/// Every row whose `key` value occurs more than once, in input order.
/// All occurrences are kept, not only the later ones.
pub fn find_duplicates_by(report: &CleanedReport, key: Column) -> CleanedReport {
    let freq = frequencies(report, key);
    let records = report
        .records()
        .iter()
        .zip(freq)
        .filter(|(_, f)| *f > 1)
        .map(|(r, _)| r.clone())
        .collect();
    report.with_records(records)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// One line of the duplicate summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// How many times each key in this bucket occurs.
    pub duplicate_count: usize,
    /// Rows observed at this count.
    pub rows: usize,
    /// Distinct keys at this count (`rows / duplicate_count`).
    pub test_cases: usize,
}

/// Rows bucketed by key frequency, plus the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSummary {
    buckets: BTreeMap<usize, CleanedReport>,
    summary: Vec<SummaryRow>,
}

impl DuplicateSummary {
    /// Frequency -> rows with that frequency.
    pub fn buckets(&self) -> &BTreeMap<usize, CleanedReport> {
        &self.buckets
    }

    /// Rows whose key occurs exactly `count` times.
    pub fn bucket(&self, count: usize) -> Option<&CleanedReport> {
        self.buckets.get(&count)
    }

    /// Summary rows, highest frequency first.
    pub fn summary(&self) -> &[SummaryRow] {
        &self.summary
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Lowest and highest frequency present.
    pub fn count_range(&self) -> Option<(usize, usize)> {
        let min = *self.buckets.keys().next()?;
        let max = *self.buckets.keys().next_back()?;
        Some((min, max))
    }

    /// Total rows across every bucket.
    pub fn total_rows(&self) -> usize {
        self.buckets.values().map(CleanedReport::len).sum()
    }
}

/// Bucket the rows of `report` by the frequency of their `key` and build
/// the summary table.
pub fn summarize(report: &CleanedReport, key: Column) -> DuplicateSummary {
    let freq = frequencies(report, key);

    let mut grouped: BTreeMap<usize, Vec<_>> = BTreeMap::new();
    for (record, count) in report.records().iter().zip(freq) {
        grouped.entry(count).or_default().push(record.clone());
    }

    let buckets: BTreeMap<usize, CleanedReport> = grouped
        .into_iter()
        .map(|(count, records)| (count, report.with_records(records)))
        .collect();

    let summary = buckets
        .iter()
        .rev()
        .map(|(&count, rows)| SummaryRow {
            duplicate_count: count,
            rows: rows.len(),
            test_cases: rows.len() / count,
        })
        .collect();

    DuplicateSummary { buckets, summary }
}
