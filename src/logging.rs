//! Diagnostic logging setup.
//!
//! Level precedence: `RUST_LOG` > `SFS_REPORT_LOG` > `[logging] level`.
//! Output goes to stderr so CLI tables and CSV on stdout stay clean.

use tracing_subscriber::EnvFilter;

use crate::config::schema::LoggingConfig;

/// Install the global subscriber. Calling it twice is harmless; the second
/// call is ignored.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_from_env("SFS_REPORT_LOG"))
            .unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
