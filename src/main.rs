use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sfs_report::cli::{self, DuplicatesArgs, OutputFormat, SlowestArgs};
use sfs_report::report::Analysis;
use sfs_report::{config, logging};

#[derive(Debug, Parser)]
#[command(name = "sfs-report")]
#[command(about = "Execution report dashboard for automated test runs")]
struct App {
    /// Execution report CSV (overrides `[data] csv_path`)
    #[arg(long, global = true)]
    file: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show KPIs, execution health and status distribution
    Summary {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the duplicate summary, or the rows executed exactly N times
    Duplicates {
        /// Show rows of test cases executed exactly this many times
        #[arg(long)]
        count: Option<usize>,
        /// Only consider test cases executed more than once
        #[arg(long)]
        repeated_only: bool,
        /// Group by this column instead of the process name
        #[arg(long)]
        key: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Rank the slowest test cases of the final analysis set
    Slowest {
        /// Number of entries (default: `[dashboard] default_top_n`)
        #[arg(long)]
        top: Option<usize>,
        /// Comma-separated statuses to include, e.g. passed,failed
        #[arg(long)]
        status: Option<String>,
        /// Only include test cases that took at least this many seconds
        #[arg(long)]
        min_seconds: Option<i64>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Print the cleaned report
    Clean {
        /// Print the final analysis set (latest run per test case) instead
        #[arg(long = "final")]
        final_only: bool,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Launch the web dashboard
    Serve {
        /// Listen address (default: `[dashboard] addr`)
        #[arg(long)]
        addr: Option<String>,
        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.sfs-report/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `dashboard.default_top_n 20`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    logging::init(&cfg.logging, app.verbose);

    let source = app
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.data.csv_path));

    let load_analysis = || -> Result<Analysis> {
        Analysis::from_path(&source, &cfg.normalizer())
            .with_context(|| format!("failed to load report {}", source.display()))
    };

    match app.command {
        Commands::Summary { format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_summary(&load_analysis()?, &cfg, fmt)
        }
        Commands::Duplicates {
            count,
            repeated_only,
            key,
            format,
        } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            let args = DuplicatesArgs {
                count,
                repeated_only,
                key,
            };
            cli::run_duplicates(&load_analysis()?, &args, fmt)
        }
        Commands::Slowest {
            top,
            status,
            min_seconds,
            format,
        } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            let args = SlowestArgs {
                top,
                status,
                min_seconds,
            };
            cli::run_slowest(&load_analysis()?, &cfg, &args, fmt)
        }
        Commands::Clean { final_only, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_clean(&load_analysis()?, final_only, fmt)
        }
        Commands::Serve { addr, no_open } => {
            cli::run_serve(&source, &cfg, addr.as_deref(), no_open)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
