//! Log setup.
//!
//! The terminal belongs to the UI while the program runs, so events are only
//! recorded when a log file is configured. The filter defaults to `info`
//! and follows `RUST_LOG` when it is set, e.g.
//! `RUST_LOG=meditation_timer=trace meditate --log-file meditate.log`.

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs a global subscriber that appends to `path`.
///
/// Returns whether the file is now receiving events: `false` when `path` is
/// `None`, or when another global subscriber was installed first (for example
/// when embedded in a larger program), in which case that subscriber keeps
/// receiving events.
pub fn init(path: Option<&Path>) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    match installed {
        Ok(()) => {
            tracing::info!(path = %path.display(), "logging started");
            Ok(true)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "log file not attached, a subscriber is already set");
            Ok(false)
        }
    }
}
