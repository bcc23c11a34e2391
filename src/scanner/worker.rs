//! Fixed-size worker pool over the dispatch queue.

use crate::config::RetryPolicy;
use crate::error::ScanError;
use crate::scanner::aggregator::ResultAggregator;
use crate::scanner::queue::TaskReceiver;
use crate::scanner::retry::{scan_with_retry, TaskOutcome};
use crate::scanner::traits::Scanner;
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

/// One long-lived worker.
struct Worker {
    id: usize,
    queue: TaskReceiver,
    scanner: Arc<dyn Scanner>,
    aggregator: Arc<ResultAggregator>,
    retry: RetryPolicy,
}

impl Worker {
    /// Consume tasks until the queue is closed and drained. Returns the
    /// number of tasks handled.
    async fn run(self) -> usize {
        let mut handled = 0;

        while let Some(task) = self.queue.next().await {
            trace!(worker = self.id, address = %task, "task taken");

            match scan_with_retry(self.scanner.as_ref(), &task, &self.retry).await {
                TaskOutcome::Open(result) => {
                    info!(address = %task, banner = ?result.banner, "open");
                    self.aggregator.record_open(result);
                }
                TaskOutcome::Exhausted {
                    attempts,
                    last_error,
                } => {
                    debug!(
                        address = %task,
                        attempts,
                        last_error = last_error.as_ref().map(tracing::field::display),
                        "no connection"
                    );
                }
            }
            self.aggregator.advance_progress();
            handled += 1;
        }

        trace!(worker = self.id, handled, "worker finished");
        handled
    }
}

/// A running pool of workers sharing one queue and one aggregator.
pub struct WorkerPool {
    handles: Vec<JoinHandle<usize>>,
}

impl WorkerPool {
    /// Spawn `count` workers.
    pub fn spawn(
        count: usize,
        queue: TaskReceiver,
        scanner: Arc<dyn Scanner>,
        aggregator: Arc<ResultAggregator>,
        retry: RetryPolicy,
    ) -> Self {
        let handles = (0..count)
            .map(|id| {
                let worker = Worker {
                    id,
                    queue: queue.clone(),
                    scanner: Arc::clone(&scanner),
                    aggregator: Arc::clone(&aggregator),
                    retry,
                };
                tokio::spawn(worker.run())
            })
            .collect();

        Self { handles }
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit. Returns the total tasks handled.
    pub async fn join(self) -> Result<usize, ScanError> {
        let mut handled = 0;
        let mut failure = None;

        for result in join_all(self.handles).await {
            match result {
                Ok(count) => handled += count,
                Err(e) => {
                    tracing::error!(error = %e, "worker terminated abnormally");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        match failure {
            Some(e) => Err(ScanError::WorkerFailed(e.to_string())),
            None => Ok(handled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeResult;
    use crate::scanner::queue::dispatch_queue;
    use crate::scanner::task::ScanTask;
    use crate::types::{Port, ScanTarget};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Even ports accept, odd ports refuse.
    struct EvenPortScanner;

    #[async_trait]
    impl Scanner for EvenPortScanner {
        async fn probe(&self, task: &ScanTask) -> ProbeResult<Option<String>> {
            if task.port().as_u16() % 2 == 0 {
                Ok(None)
            } else {
                Err(ScanError::ConnectionRefused)
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_drains_queue() {
        let (tx, rx) = dispatch_queue(4);
        let aggregator = Arc::new(ResultAggregator::new(20));
        let pool = WorkerPool::spawn(
            3,
            rx,
            Arc::new(EvenPortScanner),
            Arc::clone(&aggregator),
            RetryPolicy::new(2, Duration::from_millis(10)),
        );
        assert_eq!(pool.worker_count(), 3);

        for port in 0..20 {
            let task = ScanTask::new(ScanTarget::new("127.0.0.1"), Port::new(port));
            tx.send(task).await.unwrap();
        }
        tx.close();

        assert_eq!(pool.join().await.unwrap(), 20);
        assert!(aggregator.progress().is_complete());

        let mut open: Vec<u16> = aggregator
            .take_results()
            .iter()
            .map(|r| r.port.as_u16())
            .collect();
        open.sort_unstable();
        assert_eq!(open, (0..20).step_by(2).collect::<Vec<u16>>());
    }
}
