use pretty_assertions::assert_eq;
use sfs_report::config::ReportConfig;
use sfs_report::report::{Analysis, RawReport};

// ---------------------------------------------------------------------------
// TOML layers
// ---------------------------------------------------------------------------

#[test]
fn generated_default_file_matches_builtin_defaults() {
    let parsed: ReportConfig = toml::from_str(&ReportConfig::default_toml()).unwrap();
    assert_eq!(parsed, ReportConfig::default());
}

#[test]
fn serialized_config_parses_back() {
    let mut config = ReportConfig::default();
    config.dashboard.default_top_n = 42;
    config.columns.audit = vec!["Owner".to_string()];

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: ReportConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let config: ReportConfig = toml::from_str(
        r#"
[dashboard]
addr = "0.0.0.0:8000"
good_pass_pct = 99.0
"#,
    )
    .unwrap();

    assert_eq!(config.dashboard.addr, "0.0.0.0:8000");
    assert_eq!(config.dashboard.good_pass_pct, 99.0);
    assert_eq!(config.dashboard.moderate_pass_pct, 85.0);
    assert_eq!(config.data, ReportConfig::default().data);
}

#[test]
fn unknown_type_is_rejected() {
    let result: Result<ReportConfig, _> = toml::from_str("[dashboard]\ndefault_top_n = \"ten\"\n");
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Config drives the pipeline
// ---------------------------------------------------------------------------

#[test]
fn column_and_parsing_sections_drive_normalization() {
    let config: ReportConfig = toml::from_str(
        r#"
[columns]
title = "Batch"
process_name = "Case"
elapsed_time = "Secs"
end_time = "Done"
audit = ["Owner"]

[parsing]
timestamp_format = "%Y/%m/%d %H:%M"
title_separator = ": "
"#,
    )
    .unwrap();

    let raw = RawReport::from_reader(
        "Batch,Case,Secs,Done,Owner\n\
         Nightly: 2024-02-01 b1,TC_1,30,2024/02/01 07:45,ops\n\
         Nightly: 2024-02-02 b2,TC_1,31,2024/02/02 07:40,ops\n"
            .as_bytes(),
    )
    .unwrap();
    let analysis = Analysis::build(&raw, &config.normalizer()).unwrap();

    assert_eq!(
        analysis.cleaned().column_names(),
        ["Process Name", "Elapsed Time", "End Time", "Execution Date"]
    );
    let latest = &analysis.final_set().records()[0];
    assert_eq!(latest.execution_date.as_deref(), Some("2024-02-02"));
    assert_eq!(latest.end_time_display(), "07:40:00");
}

#[test]
fn health_thresholds_come_from_dashboard_section() {
    let config: ReportConfig =
        toml::from_str("[dashboard]\ngood_pass_pct = 50.0\nmoderate_pass_pct = 10.0\n").unwrap();
    let t = config.dashboard.health_thresholds();
    assert_eq!((t.good_pct, t.moderate_pct), (50.0, 10.0));
}
