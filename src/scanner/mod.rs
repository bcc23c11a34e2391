//! Scanner module - task generation, the worker pool and the scan
//! coordinator.
//!
//! Data flows one way: [`TaskSource`] feeds the bounded dispatch queue,
//! the [`WorkerPool`] runs the connect-retry protocol for each task and
//! reports into the [`ResultAggregator`], and the [`ScanCoordinator`]
//! assembles the final [`ScanSummary`] once the pool has drained.

pub mod aggregator;
pub mod queue;
pub mod rate_limiter;
pub mod retry;
pub mod task;
pub mod tcp;
pub mod traits;
pub mod worker;

use crate::config::ScanConfig;
use crate::error::{ConfigResult, ScanError};
use crate::types::{Port, ScanTarget};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub use aggregator::{NoProgress, ProgressSink, ResultAggregator, ScanProgress};
pub use queue::{dispatch_queue, TaskReceiver, TaskSender};
pub use rate_limiter::RateLimiter;
pub use retry::{scan_with_retry, TaskOutcome};
pub use task::{ScanTask, TaskSource};
pub use tcp::TcpConnectScanner;
pub use traits::{PortStatus, ScanResult, Scanner};
pub use worker::WorkerPool;

/// Outcome of a finished scan.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// Wall-clock time the scan started.
    pub started_at: DateTime<Utc>,
    /// Time from start to full drain of the worker pool.
    pub elapsed: Duration,
    /// Final progress; `scanned == total` for a completed scan.
    pub progress: ScanProgress,
    /// Open ports in completion order.
    pub results: Vec<ScanResult>,
}

impl ScanSummary {
    /// Number of `(target, port)` pairs scanned.
    pub fn total_ports_scanned(&self) -> usize {
        self.progress.scanned
    }

    pub fn open_count(&self) -> usize {
        self.results.len()
    }

    /// Status of one pair. Absence from the result set means closed or
    /// unreachable.
    pub fn status_of(&self, target: &str, port: u16) -> PortStatus {
        let found = self
            .results
            .iter()
            .any(|r| r.target.as_str() == target && r.port == Port::new(port));
        if found {
            PortStatus::Open
        } else {
            PortStatus::Closed
        }
    }

    /// Results ordered by target, then port.
    pub fn sorted_results(&self) -> Vec<ScanResult> {
        let mut results = self.results.clone();
        results.sort_by(|a, b| (&a.target, a.port).cmp(&(&b.target, b.port)));
        results
    }
}

/// Orchestrates one scan run.
pub struct ScanCoordinator {
    config: ScanConfig,
    total: usize,
    scanner: Arc<dyn Scanner>,
    aggregator: Arc<ResultAggregator>,
}

impl ScanCoordinator {
    /// Validate the configuration and prepare a TCP connect scan.
    ///
    /// Fails before anything is started if the configuration is invalid.
    pub fn new(config: ScanConfig) -> ConfigResult<Self> {
        let scanner = Arc::new(TcpConnectScanner::from_config(&config));
        Self::with_scanner(config, scanner)
    }

    /// Like [`ScanCoordinator::new`] with a custom probe implementation.
    pub fn with_scanner(config: ScanConfig, scanner: Arc<dyn Scanner>) -> ConfigResult<Self> {
        let total = config.validate()?;

        Ok(Self {
            config,
            total,
            scanner,
            aggregator: Arc::new(ResultAggregator::new(total)),
        })
    }

    /// Report progress and open ports to `sink` while scanning.
    ///
    /// Handles from [`ScanCoordinator::progress_handle`] stay live whether
    /// they were taken before or after this call. Only the first sink is
    /// kept.
    pub fn with_progress(self, sink: Arc<dyn ProgressSink>) -> Self {
        if self.aggregator.set_sink(sink).is_err() {
            warn!("progress sink already attached; ignoring the new one");
        }
        self
    }

    /// Number of tasks this scan will run.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Handle for reading `(scanned, total)` while the scan runs.
    pub fn progress_handle(&self) -> Arc<ResultAggregator> {
        Arc::clone(&self.aggregator)
    }

    /// Run the scan to completion.
    ///
    /// Individual task failures never fail the scan; an error is returned
    /// only if a worker itself terminated abnormally.
    pub async fn run(self) -> Result<ScanSummary, ScanError> {
        let started_at = Utc::now();
        let start = Instant::now();
        let ScanConfig {
            targets,
            ports,
            workers,
            retry,
            queue_capacity,
            ..
        } = self.config;

        info!(
            targets = targets.len(),
            ports = ports.count(),
            total = self.total,
            workers,
            "starting scan"
        );

        let (sender, receiver) = dispatch_queue(queue_capacity);
        let pool = WorkerPool::spawn(
            workers,
            receiver,
            self.scanner,
            Arc::clone(&self.aggregator),
            retry,
        );
        debug!(workers = pool.worker_count(), queue_capacity, "worker pool started");

        for task in TaskSource::new(targets, ports) {
            if let Err(task) = sender.send(task).await {
                warn!(address = %task, "dispatch queue closed early");
                break;
            }
        }
        sender.close();

        let handled = pool.join().await?;
        let elapsed = start.elapsed();
        let progress = self.aggregator.progress();
        let results = self.aggregator.take_results();

        info!(
            handled,
            open = results.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "scan complete"
        );

        Ok(ScanSummary {
            started_at,
            elapsed,
            progress,
            results,
        })
    }
}

/// Build a target list from plain host strings.
pub fn targets<I, S>(hosts: I) -> Vec<ScanTarget>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    hosts.into_iter().map(ScanTarget::new).collect()
}
