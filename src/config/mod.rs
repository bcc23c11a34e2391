//! Configuration management for portsweep.
//!
//! [`ScanConfig`] is the immutable per-run configuration; [`AppSettings`]
//! holds user defaults loaded from an XDG-compliant settings file.

mod scan;
mod settings;

pub use scan::{
    RetryPolicy, ScanConfig, BANNER_TIMEOUT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_WORKERS,
};
pub use settings::{AppSettings, Paths};
