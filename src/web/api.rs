//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. Handlers only read the
//! session's [`Analysis`](crate::report::Analysis), except `/api/reload`.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::report::stats::{self, Kpis, SlowEntry, StatusCount, StatusFilter};
use crate::report::{DuplicateSummary, SummaryRow, TableView};

use super::{Dashboard, content_type_json};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Brief summary: KPIs and the status distribution of the final set.
#[derive(Serialize)]
struct SummaryResponse {
    kpis: Kpis,
    status_distribution: Vec<StatusCount>,
    /// Lower-cased statuses offered by the slowest-ranking filter.
    status_options: Vec<String>,
}

impl SummaryResponse {
    fn new(dashboard: &Dashboard) -> Self {
        let analysis = dashboard.analysis();
        let status_distribution = stats::status_distribution(analysis.final_set());
        Self {
            kpis: stats::compute_kpis(analysis, dashboard.settings().health_thresholds()),
            status_options: stats::status_options(&status_distribution),
            status_distribution,
        }
    }
}

/// Duplicate summary plus the execution-count range for the explorer.
#[derive(Serialize)]
struct DuplicatesResponse {
    scope: &'static str,
    min_count: Option<usize>,
    max_count: Option<usize>,
    summary: Vec<SummaryRow>,
}

/// Rows of one execution-count bucket.
#[derive(Serialize)]
struct BucketResponse {
    count: usize,
    found: bool,
    table: TableView,
}

#[derive(Serialize)]
struct SlowestResponse {
    top: usize,
    entries: Vec<SlowEntry>,
}

#[derive(Serialize)]
struct HealthResponse {
    source: String,
    loaded_at: String,
    cleaned_rows: usize,
    duplicate_rows: usize,
    final_rows: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Value of a query parameter, percent-decoded.
fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Parse a numeric query parameter; missing or invalid values are `None`.
fn parse_param<T: std::str::FromStr>(url: &str, name: &str) -> Option<T> {
    query_param(url, name)?.trim().parse().ok()
}

/// The duplicate summary selected by the `scope` parameter.
fn scoped_summary<'a>(dashboard: &'a Dashboard, url: &str) -> (&'static str, &'a DuplicateSummary) {
    let analysis = dashboard.analysis();
    match query_param(url, "scope").as_deref() {
        Some("repeated") => ("repeated", analysis.repeated_summary()),
        _ => ("all", analysis.summary()),
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/summary`: KPIs and status distribution.
pub fn get_summary(dashboard: &Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&SummaryResponse::new(dashboard))
}

/// `GET /api/records?view=cleaned|final|duplicates`: a full table.
pub fn get_records(dashboard: &Dashboard, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let analysis = dashboard.analysis();
    let table = match query_param(url, "view").as_deref() {
        Some("final") => analysis.final_set(),
        Some("duplicates") => analysis.duplicates(),
        _ => analysis.cleaned(),
    };
    json_response(&table.to_view())
}

/// `GET /api/duplicates?scope=all|repeated`: duplicate count summary.
pub fn get_duplicates(dashboard: &Dashboard, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let (scope, summary) = scoped_summary(dashboard, url);
    let range = summary.count_range();

    let resp = DuplicatesResponse {
        scope,
        min_count: range.map(|(min, _)| min),
        max_count: range.map(|(_, max)| max),
        summary: summary.summary().to_vec(),
    };
    json_response(&resp)
}

/// `GET /api/duplicates/bucket?count=N&scope=all|repeated`: rows executed
/// exactly N times.
///
/// An absent count yields an empty table with `found: false`.
pub fn get_bucket(dashboard: &Dashboard, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let analysis = dashboard.analysis();
    let count = parse_param(url, "count").unwrap_or(1);
    let (_, summary) = scoped_summary(dashboard, url);

    let resp = match summary.bucket(count) {
        Some(rows) => BucketResponse {
            count,
            found: true,
            table: rows.to_view(),
        },
        None => BucketResponse {
            count,
            found: false,
            table: analysis.cleaned().with_records(Vec::new()).to_view(),
        },
    };
    json_response(&resp)
}

/// `GET /api/slowest?status=passed,failed&top=N&min_seconds=S`: ranking of
/// the slowest test cases in the final set.
pub fn get_slowest(dashboard: &Dashboard, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let analysis = dashboard.analysis();
    let top = dashboard.settings().clamp_top_n(parse_param(url, "top"));
    let filter = query_param(url, "status")
        .map(|s| StatusFilter::parse_list(&s))
        .unwrap_or_default();

    let entries = match parse_param::<i64>(url, "min_seconds") {
        Some(min) => {
            let pool = stats::filter_by_min_elapsed(analysis.final_set(), min);
            stats::slowest(&pool, &filter, top)
        }
        None => stats::slowest(analysis.final_set(), &filter, top),
    };

    json_response(&SlowestResponse { top, entries })
}

/// `POST /api/reload`: re-read the CSV and rebuild the analysis.
pub fn post_reload(dashboard: &mut Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    dashboard.reload()?;
    let result = serde_json::json!({
        "success": true,
        "rows": dashboard.analysis().cleaned().len(),
    });
    json_response(&result)
}

/// `GET /api/health`: what is loaded and when.
pub fn get_health(dashboard: &Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&health(dashboard))
}

fn health(dashboard: &Dashboard) -> HealthResponse {
    let analysis = dashboard.analysis();
    HealthResponse {
        source: dashboard.source.display().to_string(),
        loaded_at: dashboard.loaded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        cleaned_rows: analysis.cleaned().len(),
        duplicate_rows: analysis.duplicates().len(),
        final_rows: analysis.final_set().len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
