//! Error types for configuring and launching the timer.
//!
//! The session state machine itself never fails: operations issued in the
//! wrong mode are ignored. Errors only arise at the edges, while turning
//! command-line input into a [`Config`](crate::config::Config) or while
//! opening the log file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building configuration or starting the program.
#[derive(Error, Debug)]
pub enum Error {
    /// A duration string could not be parsed, e.g. `"5x"` or `"m"`.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// The text as given on the command line.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A duration parsed correctly but came out as zero seconds.
    #[error("duration '{0}' must be longer than zero seconds")]
    ZeroDuration(String),

    /// `--presets` was given but named no durations.
    #[error("at least one duration preset is required")]
    EmptyPresets,

    /// The log file could not be created or opened for append.
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// [`config::install`](crate::config::install) was called twice.
    #[error("configuration has already been installed")]
    AlreadyConfigured,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_input() {
        let err = Error::InvalidDuration {
            input: "5x".to_string(),
            reason: "unknown unit",
        };
        assert_eq!(err.to_string(), "invalid duration '5x': unknown unit");

        let err = Error::ZeroDuration("0m".to_string());
        assert!(err.to_string().contains("'0m'"));
    }

    #[test]
    fn test_log_file_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::LogFile {
            path: PathBuf::from("/nope/meditate.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nope/meditate.log"));
        assert!(err.source().is_some());
    }
}
