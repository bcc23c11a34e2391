//! Scanner trait abstraction.
//!
//! A [`Scanner`] performs exactly one connection attempt for a task. Retry
//! and backoff live above it, so any implementation gets the same retry
//! protocol.

use crate::error::ProbeResult;
use crate::scanner::task::ScanTask;
use crate::types::{Port, ScanTarget};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a scanned port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// A TCP connection was accepted.
    Open,
    /// Every attempt failed; closed, filtered or unreachable.
    Closed,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of a successful connection to one `(target, port)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub target: ScanTarget,
    pub port: Port,
    pub status: PortStatus,
    /// Text the service sent right after connecting, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl ScanResult {
    /// Record an open port. An empty banner is stored as no banner.
    pub fn open(task: &ScanTask, banner: Option<String>) -> Self {
        Self {
            target: task.target().clone(),
            port: task.port(),
            status: PortStatus::Open,
            banner: banner.filter(|b| !b.is_empty()),
        }
    }
}

/// Trait for single-attempt probe implementations.
///
/// # Example
///
/// ```ignore
/// use portsweep::scanner::{Scanner, ScanTask};
///
/// async fn probe_once<S: Scanner>(scanner: &S, task: &ScanTask) -> bool {
///     scanner.probe(task).await.is_ok()
/// }
/// ```
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Make one connection attempt.
    ///
    /// On success returns the banner captured, if any. A failed banner read
    /// is not an error here; only connection failures are.
    async fn probe(&self, task: &ScanTask) -> ProbeResult<Option<String>>;
}
