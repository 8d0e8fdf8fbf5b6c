//! Latest-occurrence resolution and the final analysis set.
//!
//! For a repeated test case only its most recent execution counts: the
//! occurrence with the greatest execution date, then the greatest end time.
//! Execution dates are compared as calendar dates whenever they parse, so
//! the order never depends on how the batch title spelled the date.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};

use super::columns::Column;
use super::duplicates::{find_duplicates_by, frequencies};
use super::record::{CleanedRecord, CleanedReport};

/// Date formats tried, in order, when comparing execution dates.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Sortable form of an execution date.
///
/// Missing < unparsable text < parsed date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Missing,
    Text(String),
    Date(NaiveDate),
}

impl DateKey {
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Missing;
        };
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .map(Self::Date)
            .unwrap_or_else(|| Self::Text(value.to_string()))
    }
}

/// Recency key of a record: (execution date, end time). Unknown end times
/// sort lowest.
fn recency(record: &CleanedRecord) -> (DateKey, Option<NaiveTime>) {
    (
        DateKey::parse(record.execution_date.as_deref()),
        record.end_time,
    )
}

fn compare_recency(a: &CleanedRecord, b: &CleanedRecord) -> Ordering {
    recency(a).cmp(&recency(b))
}

/// Pick the most recent row for every key in `duplicates`.
///
/// Output is ordered by ascending recency; rows with identical recency keep
/// input order and the later one wins.
pub fn select_latest(duplicates: &CleanedReport, key: Column) -> CleanedReport {
    let mut ordered: Vec<&CleanedRecord> = duplicates.records().iter().collect();
    ordered.sort_by(|a, b| compare_recency(a, b));

    // Position of the last occurrence of each key in recency order.
    let mut last: HashMap<Option<String>, usize> = HashMap::new();
    for (pos, record) in ordered.iter().enumerate() {
        last.insert(duplicates.key(record, key), pos);
    }
    let keep: HashSet<usize> = last.into_values().collect();

    let records = ordered
        .into_iter()
        .enumerate()
        .filter(|(pos, _)| keep.contains(pos))
        .map(|(_, r)| r.clone())
        .collect();
    duplicates.with_records(records)
}

/// One row per process name: unique rows in input order, then the latest
/// occurrence of every repeated process.
pub fn final_analysis_set(cleaned: &CleanedReport) -> CleanedReport {
    final_analysis_set_by(cleaned, Column::ProcessName)
}

pub fn final_analysis_set_by(cleaned: &CleanedReport, key: Column) -> CleanedReport {
    let freq = frequencies(cleaned, key);
    let mut records: Vec<CleanedRecord> = cleaned
        .records()
        .iter()
        .zip(freq)
        .filter(|(_, f)| *f == 1)
        .map(|(r, _)| r.clone())
        .collect();

    let latest = select_latest(&find_duplicates_by(cleaned, key), key);
    records.extend(latest.into_records());
    cleaned.with_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, date: Option<&str>, end: Option<(u32, u32)>) -> CleanedRecord {
        CleanedRecord {
            process_name: Some(name.to_string()),
            start_time: None,
            end_time: end.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            elapsed: None,
            execution_date: date.map(str::to_string),
            status: None,
            extra: Vec::new(),
        }
    }

    fn report(records: Vec<CleanedRecord>) -> CleanedReport {
        CleanedReport::new(
            vec![Column::ProcessName, Column::EndTime, Column::ExecutionDate],
            Vec::new(),
            records,
        )
    }

    #[test]
    fn date_key_orders_parsed_dates_chronologically() {
        let a = DateKey::parse(Some("31-12-2023"));
        let b = DateKey::parse(Some("2024-01-01"));
        assert!(a < b);
        assert!(DateKey::parse(None) < DateKey::parse(Some("garbage")));
        assert!(DateKey::parse(Some("garbage")) < DateKey::parse(Some("2000-01-01")));
        assert_eq!(DateKey::parse(Some("  ")), DateKey::Missing);
    }

    #[test]
    fn latest_by_date_then_end_time() {
        let dups = report(vec![
            rec("a", Some("2024-01-06"), Some((9, 0))),
            rec("a", Some("2024-01-06"), Some((11, 0))),
            rec("a", Some("2024-01-05"), Some((23, 0))),
        ]);
        let latest = select_latest(&dups, Column::ProcessName);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest.records()[0].end_time, NaiveTime::from_hms_opt(11, 0, 0));
    }

    #[test]
    fn unknown_end_time_loses_tie() {
        let dups = report(vec![
            rec("a", Some("2024-01-06"), Some((0, 1))),
            rec("a", Some("2024-01-06"), None),
        ]);
        let latest = select_latest(&dups, Column::ProcessName);
        assert_eq!(latest.records()[0].end_time, NaiveTime::from_hms_opt(0, 1, 0));
    }

    #[test]
    fn identical_recency_prefers_later_row() {
        let mut first = rec("a", Some("2024-01-06"), Some((9, 0)));
        first.status = Some("failed".into());
        let mut second = rec("a", Some("2024-01-06"), Some((9, 0)));
        second.status = Some("passed".into());
        let latest = select_latest(&report(vec![first, second]), Column::ProcessName);
        assert_eq!(latest.records()[0].status.as_deref(), Some("passed"));
    }

    #[test]
    fn final_set_has_one_row_per_key() {
        let cleaned = report(vec![
            rec("b", Some("2024-01-05"), Some((8, 0))),
            rec("a", Some("2024-01-05"), Some((9, 0))),
            rec("c", Some("2024-01-05"), Some((9, 0))),
            rec("a", Some("2024-01-06"), Some((7, 0))),
        ]);
        let fin = final_analysis_set(&cleaned);
        let names: Vec<_> = fin
            .records()
            .iter()
            .map(|r| r.process_name.clone().unwrap())
            .collect();
        assert_eq!(names, ["b", "c", "a"]);
        assert_eq!(fin.records()[2].execution_date.as_deref(), Some("2024-01-06"));
    }
}
