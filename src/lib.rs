//! sfs-report: execution report analysis for automated test runs.
//!
//! Reads a test-execution CSV export, normalizes it, finds test cases that
//! ran more than once, and reduces the report to one row per test case.
//! Results are presented through the CLI or an embedded web dashboard.

pub mod cli;
pub mod config;
pub mod logging;
pub mod report;
pub mod web;
