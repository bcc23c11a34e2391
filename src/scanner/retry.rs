//! Connect-retry protocol.
//!
//! A task is attempted up to `max_attempts` times. Failed attempt `i` is
//! followed by a `base * 2^i` sleep, except the last one. The sleep only
//! blocks the calling worker.

use crate::config::RetryPolicy;
use crate::error::ScanError;
use crate::scanner::task::ScanTask;
use crate::scanner::traits::{ScanResult, Scanner};
use tracing::debug;

/// How a task ended.
#[derive(Debug)]
pub enum TaskOutcome {
    /// A connection succeeded.
    Open(ScanResult),
    /// Every attempt failed. Nothing is recorded for the task.
    Exhausted {
        attempts: u32,
        last_error: Option<ScanError>,
    },
}

/// Run the connect-retry protocol for one task.
pub async fn scan_with_retry(
    scanner: &dyn Scanner,
    task: &ScanTask,
    policy: &RetryPolicy,
) -> TaskOutcome {
    let mut last_error = None;

    for attempt in 0..policy.max_attempts {
        match scanner.probe(task).await {
            Ok(banner) => return TaskOutcome::Open(ScanResult::open(task, banner)),
            Err(e) => {
                let backoff = policy.backoff(attempt);
                debug!(
                    target_host = %task.target(),
                    port = task.port().as_u16(),
                    attempt = attempt + 1,
                    error = %e,
                    backoff_ms = backoff.map(|d| d.as_millis() as u64),
                    "connection attempt failed"
                );
                last_error = Some(e);

                if let Some(delay) = backoff {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    TaskOutcome::Exhausted {
        attempts: policy.max_attempts,
        last_error,
    }
}
