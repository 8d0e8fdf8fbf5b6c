//! Embedded web dashboard for sfs-report.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page execution report dashboard
//! - JSON API endpoints for KPIs, tables, duplicate buckets and rankings
//!
//! Launched via `sfs-report serve` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{info, warn};

use crate::config::schema::DashboardConfig;
use crate::report::{Analysis, Normalizer};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The report held for the lifetime of one dashboard session.
///
/// Requests only read the analysis; `POST /api/reload` builds a fresh one
/// from the source file and swaps it in.
pub struct Dashboard {
    source: PathBuf,
    normalizer: Normalizer,
    settings: DashboardConfig,
    analysis: Analysis,
    loaded_at: DateTime<Local>,
}

impl Dashboard {
    /// Load and analyze `source`.
    pub fn load(source: &Path, normalizer: Normalizer, settings: DashboardConfig) -> Result<Self> {
        let analysis = Analysis::from_path(source, &normalizer)
            .with_context(|| format!("failed to load report {}", source.display()))?;
        Ok(Self::new(source, normalizer, settings, analysis))
    }

    /// Wrap an existing analysis.
    pub fn new(
        source: &Path,
        normalizer: Normalizer,
        settings: DashboardConfig,
        analysis: Analysis,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            normalizer,
            settings,
            analysis,
            loaded_at: Local::now(),
        }
    }

    /// Re-read the source file. On failure the previous analysis is kept.
    pub fn reload(&mut self) -> Result<()> {
        let analysis = Analysis::from_path(&self.source, &self.normalizer)
            .with_context(|| format!("failed to reload report {}", self.source.display()))?;
        self.analysis = analysis;
        self.loaded_at = Local::now();
        Ok(())
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn settings(&self) -> &DashboardConfig {
        &self.settings
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard). Errors are reported per request without
/// stopping the server.
pub fn serve(addr: &str, mut dashboard: Dashboard, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("sfs-report dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let url = format!("http://{addr}");
        if let Err(e) = open_browser(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Drain the body so keep-alive connections stay in sync
        if matches!(method, Method::Post | Method::Put) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
        }

        let (resp, status) = match dispatch(&method, &url, &mut dashboard) {
            Ok((resp, status)) => (resp, status),
            Err(e) => {
                warn!(%method, %url, error = %format!("{e:#}"), "request failed");
                let body = serde_json::json!({ "error": format!("{e:#}") }).to_string();
                let resp = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                (resp, 500)
            }
        };

        let _ = request.respond(resp);
        info!(%method, %url, status, "request");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

type HttpResponse = Response<Cursor<Vec<u8>>>;

/// Dispatch an incoming request to the appropriate handler. Returns the
/// response and its status code for the access log.
fn dispatch(method: &Method, url: &str, dashboard: &mut Dashboard) -> Result<(HttpResponse, u16)> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    let resp = match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => serve_frontend(),

        // API: report
        (&Method::Get, "/api/summary") => api::get_summary(dashboard)?,
        (&Method::Get, "/api/records") => api::get_records(dashboard, url)?,
        (&Method::Get, "/api/duplicates") => api::get_duplicates(dashboard, url)?,
        (&Method::Get, "/api/duplicates/bucket") => api::get_bucket(dashboard, url)?,
        (&Method::Get, "/api/slowest") => api::get_slowest(dashboard, url)?,

        // API: session
        (&Method::Post, "/api/reload") => api::post_reload(dashboard)?,
        (&Method::Get, "/api/health") => api::get_health(dashboard)?,

        // 404
        _ => return Ok((not_found(), 404)),
    };

    Ok((resp, 200))
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> HttpResponse {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").expect("static header is valid")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
