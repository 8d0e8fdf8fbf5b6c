use pretty_assertions::assert_eq;
use sfs_report::report::duplicates::{find_duplicates_by, frequencies};
use sfs_report::report::{
    CleanedReport, Column, RawReport, SummaryRow, find_duplicates, normalize, summarize,
};

fn report(names: &[&str]) -> CleanedReport {
    let mut csv = String::from("StartingProcessName,ElapsedTime,Robot\n");
    for (i, name) in names.iter().enumerate() {
        csv.push_str(&format!("{name},{i},R{}\n", i % 2));
    }
    normalize(&RawReport::from_reader(csv.as_bytes()).unwrap()).unwrap()
}

fn names(report: &CleanedReport) -> Vec<String> {
    report
        .records()
        .iter()
        .map(|r| r.process_name.clone().unwrap_or_default())
        .collect()
}

fn row(duplicate_count: usize, rows: usize, test_cases: usize) -> SummaryRow {
    SummaryRow {
        duplicate_count,
        rows,
        test_cases,
    }
}

// ---------------------------------------------------------------------------
// find_duplicates
// ---------------------------------------------------------------------------

#[test]
fn duplicates_keep_every_occurrence_in_input_order() {
    let input = report(&["A", "B", "A", "C", "B", "A"]);
    let dups = find_duplicates(&input);
    assert_eq!(names(&dups), ["A", "B", "A", "B", "A"]);
}

#[test]
fn no_duplicates_gives_empty_table_with_same_columns() {
    let input = report(&["A", "B", "C"]);
    let dups = find_duplicates(&input);
    assert!(dups.is_empty());
    assert_eq!(dups.column_names(), input.column_names());
}

#[test]
fn empty_process_names_are_one_group() {
    let input = report(&["", "A", ""]);
    assert_eq!(frequencies(&input, Column::ProcessName), [2, 1, 2]);
    assert_eq!(find_duplicates(&input).len(), 2);
}

#[test]
fn padded_process_names_are_distinct_keys() {
    let input = report(&[" TC_A", "TC_A", "TC_A"]);
    assert_eq!(frequencies(&input, Column::ProcessName), [1, 2, 2]);
    assert_eq!(names(&find_duplicates(&input)), ["TC_A", "TC_A"]);
}

#[test]
fn duplicates_by_other_column() {
    let input = report(&["A", "B", "C"]);
    let robot = input.column("Robot").unwrap();
    // R0, R1, R0
    assert_eq!(find_duplicates_by(&input, robot).len(), 2);
}

// ---------------------------------------------------------------------------
// summarize
// ---------------------------------------------------------------------------

#[test]
fn summary_is_sorted_by_descending_frequency() {
    // frequencies: A=3, B=2, C=1, D=1
    let input = report(&["A", "B", "A", "C", "B", "A", "D"]);
    let summary = summarize(&input, Column::ProcessName);

    assert_eq!(summary.buckets().keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
    assert_eq!(
        summary.summary(),
        [row(3, 3, 1), row(2, 2, 1), row(1, 2, 2)]
    );
    assert_eq!(names(summary.bucket(1).unwrap()), ["C", "D"]);
    assert_eq!(summary.count_range(), Some((1, 3)));
}

#[test]
fn buckets_partition_the_table() {
    let input = report(&["A", "B", "A", "C", "B", "A", "", "E", ""]);
    let summary = summarize(&input, Column::ProcessName);

    assert_eq!(summary.total_rows(), input.len());
    for (&count, rows) in summary.buckets() {
        let freq = frequencies(rows, Column::ProcessName);
        assert!(freq.iter().all(|&f| f == count), "bucket {count}: {freq:?}");
        assert_eq!(rows.len() % count, 0);
    }
}

#[test]
fn summarize_is_deterministic() {
    let input = report(&["X", "Y", "X", "Z", "Y", "X"]);
    let first = summarize(&input, Column::ProcessName);
    let second = summarize(&input, Column::ProcessName);
    assert_eq!(first, second);
}

#[test]
fn empty_table_summarizes_to_nothing() {
    let input = report(&[]);
    assert!(find_duplicates(&input).is_empty());

    let summary = summarize(&input, Column::ProcessName);
    assert!(summary.is_empty());
    assert!(summary.summary().is_empty());
    assert_eq!(summary.count_range(), None);
}

#[test]
fn summary_of_duplicates_has_no_singletons() {
    let input = report(&["A", "B", "A", "C"]);
    let summary = summarize(&find_duplicates(&input), Column::ProcessName);
    assert_eq!(summary.summary(), [row(2, 2, 1)]);
    assert!(summary.bucket(1).is_none());
}
