//! Logging setup

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::types::{ContribtrackError, Result};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CONTRIBTRACK_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    /// Appends to a file; used while the TUI owns the terminal
    File(PathBuf),
}

/// Build the filter from an optional directive string
fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber
pub fn init(target: LogTarget) -> Result<()> {
    let directive = std::env::var(LOG_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from(directive.as_deref()))
        .with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    installed.map_err(|e| ContribtrackError::Config(format!("cannot install logger: {}", e)))
}
