//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Configuration errors
//! are fatal and raised before any worker starts; scan errors are per-attempt
//! and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while a single connection attempt is made.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("connection to {target}:{port} failed: {reason}")]
    ConnectionFailed {
        target: String,
        port: u16,
        reason: String,
    },

    #[error("connection timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("host unreachable")]
    HostUnreachable,

    #[error("banner read failed: {0}")]
    BannerRead(String),

    #[error("scan worker failed: {0}")]
    WorkerFailed(String),
}

impl ScanError {
    /// Classify an I/O error returned by a connect call.
    pub fn from_connect_error(err: std::io::Error, target: &str, port: u16) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            ErrorKind::TimedOut => Self::Timeout,
            _ => {
                let error_str = err.to_string().to_lowercase();
                if error_str.contains("unreachable") {
                    if error_str.contains("host") {
                        Self::HostUnreachable
                    } else {
                        Self::NetworkUnreachable(err.to_string())
                    }
                } else {
                    Self::ConnectionFailed {
                        target: target.to_string(),
                        port,
                        reason: err.to_string(),
                    }
                }
            }
        }
    }
}

/// Result type alias for a single probe.
pub type ProbeResult<T> = Result<T, ScanError>;

/// Configuration errors. Any of these aborts the run before scanning.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("a target is required (use --target or --targets)")]
    MissingTarget,

    #[error("cannot use both --target and --targets")]
    ConflictingTargets,

    #[error("empty entry in target list")]
    EmptyTarget,

    #[error(transparent)]
    InvalidPort(#[from] crate::types::PortError),

    #[error("both --start-port and --end-port are required when combined with --ports")]
    IncompleteRange,

    #[error("no ports to scan")]
    NoPorts,

    #[error("invalid timeout {0}: must be a non-negative number of seconds")]
    InvalidTimeout(i64),

    #[error("invalid worker count {0}: must be a positive integer")]
    InvalidWorkerCount(i64),

    #[error("invalid queue capacity: must be positive")]
    InvalidQueueCapacity,

    #[error("invalid retry policy: at least one attempt is required")]
    InvalidRetryPolicy,

    #[error("task count overflows: {targets} targets x {ports} ports")]
    TaskCountOverflow { targets: usize, ports: usize },

    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
