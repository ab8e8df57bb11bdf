//! Log setup
//!
//! The TUI owns the terminal, so logs only go to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the `-v` derived filter
pub const LOG_ENV: &str = "RINGTIMER_LOG";

/// Map `-v` count to a filter directive
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a plain-text subscriber appending to `path`.
///
/// `RINGTIMER_LOG` takes precedence over `verbosity`. Safe to call twice.
pub fn init_file_logging(path: &Path, verbosity: u8) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(verbosity >= 2)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
