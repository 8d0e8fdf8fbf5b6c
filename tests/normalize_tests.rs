use std::path::Path;

use pretty_assertions::assert_eq;
use sfs_report::report::normalize::parse_elapsed;
use sfs_report::report::{Column, ColumnNames, Normalizer, RawReport, ReportError, normalize};

fn raw(csv: &str) -> RawReport {
    RawReport::from_reader(csv.as_bytes()).unwrap()
}

fn fixture() -> RawReport {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/execution_report.csv");
    RawReport::from_path(&path).unwrap()
}

// ---------------------------------------------------------------------------
// Cleaned row shape
// ---------------------------------------------------------------------------

#[test]
fn well_formed_row_is_cleaned() {
    let report = normalize(&raw(
        "Title,StartingProcessName,ElapsedTime,StartTime,EndTime\n\
         Nightly Run - 2024-01-05 Batch1,TC_Login,125,05-01-2024 10:00,05-01-2024 10:02\n",
    ))
    .unwrap();

    let view = report.to_view();
    assert_eq!(
        view.columns,
        ["Process Name", "Elapsed Time", "Start Time", "End Time", "Execution Date"]
    );
    assert_eq!(
        view.rows[0],
        ["TC_Login", "0:02:05", "10:00:00", "10:02:00", "2024-01-05"]
    );
}

#[test]
fn malformed_title_gives_empty_execution_date() {
    let report = normalize(&raw(
        "Title,StartingProcessName,ElapsedTime\nMalformedTitleNoSeparator,TC_A,10\n",
    ))
    .unwrap();

    let record = &report.records()[0];
    assert_eq!(record.execution_date, None);
    assert_eq!(report.cell(record, Column::ExecutionDate), "");
}

#[test]
fn fixture_drops_title_and_audit_columns() {
    let report = normalize(&fixture()).unwrap();
    assert_eq!(
        report.column_names(),
        [
            "Process Name",
            "Start Time",
            "End Time",
            "Elapsed Time",
            "Status",
            "Robot",
            "Execution Date"
        ]
    );
}

#[test]
fn unparsable_cells_become_empty() {
    let report = normalize(&fixture()).unwrap();
    let view = report.to_view();
    let logout = view.rows.iter().find(|r| r[0] == "TC_Logout").unwrap();
    assert_eq!(logout, &["TC_Logout", "", "", "", "passed", "BOT-3", ""]);
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

#[test]
fn row_count_is_preserved() {
    let input = fixture();
    let report = normalize(&input).unwrap();
    assert_eq!(report.len(), input.len());

    let empty = raw("StartingProcessName,ElapsedTime\n");
    assert!(normalize(&empty).unwrap().is_empty());
}

#[test]
fn input_is_not_modified() {
    let input = fixture();
    let before = input.clone();
    let _ = normalize(&input).unwrap();
    assert_eq!(input, before);
}

#[test]
fn missing_required_column_is_an_error() {
    let err = normalize(&raw("Title,ElapsedTime\nRun - 2024-01-05 B,1\n")).unwrap_err();
    assert!(matches!(
        &err,
        ReportError::MissingColumn { column } if column == "StartingProcessName"
    ));
    assert!(err.to_string().contains("StartingProcessName"));

    let err = normalize(&raw("StartingProcessName\nTC_A\n")).unwrap_err();
    assert!(matches!(err, ReportError::MissingColumn { .. }));
}

#[test]
fn optional_columns_may_be_absent() {
    let report = normalize(&raw("StartingProcessName,ElapsedTime\nTC_A,3661\n")).unwrap();
    let record = &report.records()[0];
    assert_eq!(record.start_time, None);
    assert_eq!(record.status, None);
    assert_eq!(record.elapsed_display(), "1:01:01");
}

// ---------------------------------------------------------------------------
// Configurable names and formats
// ---------------------------------------------------------------------------

#[test]
fn custom_column_names_and_formats() {
    let columns = ColumnNames {
        title: "Batch".to_string(),
        process_name: "TestCase".to_string(),
        elapsed_time: "Seconds".to_string(),
        end_time: "Finished".to_string(),
        ..ColumnNames::default()
    };
    let normalizer = Normalizer::new(columns, "%Y-%m-%dT%H:%M:%S", " | ");
    let report = normalizer
        .normalize(&raw(
            "Batch,TestCase,Seconds,Finished\nSmoke | 05.01.2024 rerun,TC_9,7.9,2024-01-05T23:59:30\n",
        ))
        .unwrap();

    let record = &report.records()[0];
    assert_eq!(record.process_name.as_deref(), Some("TC_9"));
    assert_eq!(record.elapsed_seconds(), Some(7));
    assert_eq!(record.end_time_display(), "23:59:30");
    assert_eq!(record.execution_date.as_deref(), Some("05.01.2024"));
}

#[test]
fn elapsed_parsing_edge_cases() {
    assert_eq!(parse_elapsed("0").map(|d| d.num_seconds()), Some(0));
    assert_eq!(parse_elapsed(" 90000 ").map(|d| d.num_seconds()), Some(90_000));
    assert_eq!(parse_elapsed("12.99").map(|d| d.num_seconds()), Some(12));
    assert_eq!(parse_elapsed("-5"), None);
    assert_eq!(parse_elapsed("NaN"), None);
    assert_eq!(parse_elapsed("inf"), None);
    assert_eq!(parse_elapsed(""), None);
}

#[test]
fn bom_and_padded_headers_are_tolerated() {
    let report = normalize(&raw(
        "\u{feff} StartingProcessName , ElapsedTime\nTC_A,5\nTC_B\n",
    ))
    .unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.records()[1].elapsed, None);
}

#[test]
fn invalid_utf8_cell_does_not_block_other_rows() {
    let csv: &[u8] = b"Title,StartingProcessName,ElapsedTime\n\
        Run - 2024-01-05 B1,TC_A,10\n\
        Run - 2024-01-05 Caf\xe9,TC_B,20\n";
    let report = normalize(&RawReport::from_reader(csv).unwrap()).unwrap();
    assert_eq!(report.len(), 2);

    let b = &report.records()[1];
    assert_eq!(b.process_name.as_deref(), Some("TC_B"));
    assert_eq!(b.elapsed.map(|d| d.num_seconds()), Some(20));
    assert_eq!(b.execution_date.as_deref(), Some("2024-01-05"));
}
