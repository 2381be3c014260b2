//! Tracing setup
//!
//! While the TUI owns the terminal, log lines would corrupt the screen, so
//! they go to a file in the base directory. Everywhere else they go to stderr.
//! `RUST_LOG` overrides the default level in both cases.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::PatunganPaths;
use crate::error::PatunganResult;

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, `warn` and above unless `RUST_LOG` says otherwise
    Stderr,
    /// `patungan.log` in the base directory, `info` and above by default
    File,
}

impl LogTarget {
    fn default_filter(self) -> &'static str {
        match self {
            Self::Stderr => "warn",
            Self::File => "info",
        }
    }
}

fn env_filter(target: LogTarget) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(target.default_filter()))
}

/// Install the global subscriber
///
/// Calling it twice is harmless; the second subscriber is ignored.
pub fn init(target: LogTarget, paths: &PatunganPaths) -> PatunganResult<()> {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(target))
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File => {
            let file = open_log_file(paths)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(target))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }
    Ok(())
}

fn open_log_file(paths: &PatunganPaths) -> PatunganResult<File> {
    paths.ensure_directories()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(paths.log_file())?;
    Ok(file)
}
