//! Process-wide logging setup.
//!
//! Installed once from `main`. Logs go to stderr and, when a log file is
//! given, are appended there too without ANSI colors.
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Handle for the installed logging setup; lives until the process exits.
#[derive(Debug)]
pub struct Logging {
    log_file: Option<PathBuf>,
}

impl Logging {
    /// Return the file log path, if one could be opened.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter. A log file that cannot be opened
/// is reported on stderr and skipped.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<Logging> {
    let default_directive = if verbose {
        "abritamr=debug"
    } else {
        "abritamr=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some((path.to_path_buf(), file)),
            Err(err) => {
                eprintln!("warning: cannot open log file {}: {err}", path.display());
                None
            }
        }
    });
    let (log_file, file_layer) = match file {
        Some((path, file)) => (
            Some(path),
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            ),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .with(file_layer)
        .try_init()
        .context("install logging subscriber")?;

    Ok(Logging { log_file })
}
