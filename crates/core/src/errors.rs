//! Error types for the mergedrs core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.
//!
//! "No merge declared" and "not a log entry" are not errors: parsers report
//! them as `None`.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Svn(#[from] SvnError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

// ---------------------------------------------------------------------------
// SVN errors
// ---------------------------------------------------------------------------

/// A failed query against the repository.
///
/// Fatal only while resolving the head revision; per-revision queries
/// downgrade it to "no data for this revision".
#[derive(Debug, Error)]
pub enum SvnError {
    /// The `svn` binary could not be spawned.
    #[error("svn binary not found: {0}")]
    BinaryNotFound(String),

    /// An `svn` command exited with a non-zero status.
    #[error("svn command failed (exit {exit_code}): {stderr}")]
    CommandFailed { exit_code: i32, stderr: String },

    /// An `svn` command did not complete within the configured timeout.
    #[error("svn command timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The command succeeded but its output could not be interpreted.
    #[error("unexpected svn output: {0}")]
    UnexpectedOutput(String),

    /// Generic I/O wrapper.
    #[error("svn I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading, validation and range parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// A scan range could not be parsed or is inverted.
    #[error("invalid revision range '{input}': {detail}")]
    InvalidRange { input: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors from writing the report file.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output directory could not be created.
    #[error("cannot create report directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The report file could not be opened.
    #[error("cannot open report file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing a line failed.
    #[error("report write error: {0}")]
    Write(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = SvnError::Timeout { secs: 30 };
        assert_eq!(err.to_string(), "svn command timed out after 30s");

        let err = SvnError::CommandFailed {
            exit_code: 1,
            stderr: "E170000: URL doesn't exist".into(),
        };
        assert!(err.to_string().contains("exit 1"));

        let err = ConfigError::InvalidRange {
            input: "9-3".into(),
            detail: "begin is greater than end".into(),
        };
        assert!(err.to_string().contains("'9-3'"));
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let core_err: CoreError = SvnError::BinaryNotFound("svn".into()).into();
        assert!(matches!(core_err, CoreError::Svn(_)));

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let core_err: CoreError = ReportError::Write(io).into();
        assert!(matches!(core_err, CoreError::Report(_)));
    }
}
