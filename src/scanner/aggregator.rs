//! Shared result aggregator.
//!
//! Holds the open-port result set and the scanned counter behind a single
//! mutex. Workers only ever append a result or advance the counter; the
//! backing vector is never handed out while a scan is running.

use crate::scanner::traits::ScanResult;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// A `(scanned, total)` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanProgress {
    pub scanned: usize,
    pub total: usize,
}

impl ScanProgress {
    pub fn is_complete(&self) -> bool {
        self.scanned == self.total
    }
}

/// Receives progress notifications from the aggregator.
///
/// Callbacks run after the aggregator's lock is released, so they never
/// stall other workers. Progress notifications from different workers may
/// therefore arrive out of counter order; each call stands for exactly one
/// finished task.
pub trait ProgressSink: Send + Sync {
    /// An open port was recorded.
    fn on_open(&self, _result: &ScanResult) {}

    /// The scanned counter moved.
    fn on_progress(&self, _progress: ScanProgress) {}
}

/// A sink that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

#[derive(Debug, Default)]
struct Inner {
    results: Vec<ScanResult>,
    scanned: usize,
}

/// Thread-safe accumulator of results and progress for one scan.
pub struct ResultAggregator {
    total: usize,
    inner: Mutex<Inner>,
    sink: OnceLock<Arc<dyn ProgressSink>>,
}

impl ResultAggregator {
    /// Create an aggregator for `total` tasks.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            inner: Mutex::new(Inner::default()),
            sink: OnceLock::new(),
        }
    }

    /// Create an aggregator that reports to `sink`.
    pub fn with_sink(total: usize, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            sink: OnceLock::from(sink),
            ..Self::new(total)
        }
    }

    /// Attach a sink to an existing aggregator. Only the first sink sticks;
    /// a later one is handed back.
    pub fn set_sink(&self, sink: Arc<dyn ProgressSink>) -> Result<(), Arc<dyn ProgressSink>> {
        self.sink.set(sink)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an open-port result.
    pub fn record_open(&self, result: ScanResult) {
        if let Some(sink) = self.sink.get() {
            sink.on_open(&result);
        }
        self.lock().results.push(result);
    }

    /// Count one finished task and return the new progress.
    pub fn advance_progress(&self) -> ScanProgress {
        let (progress, advanced) = {
            let mut inner = self.lock();
            let advanced = inner.scanned < self.total;
            if advanced {
                inner.scanned += 1;
            }
            let progress = ScanProgress {
                scanned: inner.scanned,
                total: self.total,
            };
            (progress, advanced)
        };

        if !advanced {
            tracing::warn!(total = self.total, "progress advanced past total");
        } else if let Some(sink) = self.sink.get() {
            sink.on_progress(progress);
        }
        progress
    }

    /// Current progress.
    pub fn progress(&self) -> ScanProgress {
        ScanProgress {
            scanned: self.lock().scanned,
            total: self.total,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Take the result set, in completion order. Meant to be called once
    /// the worker pool has drained.
    pub fn take_results(&self) -> Vec<ScanResult> {
        std::mem::take(&mut self.lock().results)
    }
}

impl std::fmt::Debug for ResultAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultAggregator")
            .field("total", &self.total)
            .field("inner", &*self.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::task::ScanTask;
    use crate::types::{Port, ScanTarget};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn result(port: u16) -> ScanResult {
        let task = ScanTask::new(ScanTarget::new("127.0.0.1"), Port::new(port));
        ScanResult::open(&task, None)
    }

    #[derive(Default)]
    struct CountingSink {
        opens: AtomicUsize,
        ticks: AtomicUsize,
        max_scanned: AtomicUsize,
    }

    impl ProgressSink for CountingSink {
        fn on_open(&self, _result: &ScanResult) {
            self.opens.fetch_add(1, Ordering::SeqCst);
        }

        fn on_progress(&self, progress: ScanProgress) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
            self.max_scanned.fetch_max(progress.scanned, Ordering::SeqCst);
        }
    }

    /// Sink that checks the aggregator lock is free during callbacks.
    struct LockProbingSink {
        aggregator: OnceLock<Arc<ResultAggregator>>,
        calls: AtomicUsize,
    }

    impl LockProbingSink {
        fn assert_unlocked(&self) {
            if let Some(aggregator) = self.aggregator.get() {
                assert!(aggregator.inner.try_lock().is_ok(), "callback ran under the lock");
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl ProgressSink for LockProbingSink {
        fn on_open(&self, _result: &ScanResult) {
            self.assert_unlocked();
        }

        fn on_progress(&self, _progress: ScanProgress) {
            self.assert_unlocked();
        }
    }

    #[test]
    fn test_record_and_advance() {
        let aggregator = ResultAggregator::new(2);
        aggregator.record_open(result(80));

        assert_eq!(aggregator.advance_progress(), ScanProgress { scanned: 1, total: 2 });
        assert!(!aggregator.progress().is_complete());
        aggregator.advance_progress();
        assert!(aggregator.progress().is_complete());

        assert_eq!(aggregator.take_results(), vec![result(80)]);
        assert!(aggregator.take_results().is_empty());
    }

    #[test]
    fn test_never_exceeds_total() {
        let sink = Arc::new(CountingSink::default());
        let aggregator = ResultAggregator::with_sink(1, sink.clone());
        aggregator.advance_progress();
        aggregator.advance_progress();
        assert_eq!(aggregator.progress().scanned, 1);
        assert_eq!(sink.ticks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sink_attached_later_and_only_once() {
        let aggregator = ResultAggregator::new(2);
        aggregator.advance_progress();

        let first = Arc::new(CountingSink::default());
        assert!(aggregator.set_sink(first.clone()).is_ok());
        assert!(aggregator.set_sink(Arc::new(NoProgress)).is_err());

        aggregator.record_open(result(22));
        aggregator.advance_progress();
        assert_eq!(first.opens.load(Ordering::SeqCst), 1);
        assert_eq!(first.ticks.load(Ordering::SeqCst), 1);
        assert_eq!(first.max_scanned.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_callbacks_run_outside_lock() {
        let sink = Arc::new(LockProbingSink {
            aggregator: OnceLock::new(),
            calls: AtomicUsize::new(0),
        });
        let aggregator = Arc::new(ResultAggregator::with_sink(1, sink.clone()));
        assert!(sink.aggregator.set(Arc::clone(&aggregator)).is_ok());

        aggregator.record_open(result(443));
        aggregator.advance_progress();
        assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_exact() {
        let sink = Arc::new(CountingSink::default());
        let aggregator = Arc::new(ResultAggregator::with_sink(800, sink.clone()));

        let handles: Vec<_> = (0..8u16)
            .map(|worker| {
                let aggregator = Arc::clone(&aggregator);
                tokio::spawn(async move {
                    for i in 0..100u16 {
                        if i % 10 == 0 {
                            aggregator.record_open(result(worker * 100 + i));
                        }
                        aggregator.advance_progress();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(aggregator.progress(), ScanProgress { scanned: 800, total: 800 });
        assert_eq!(aggregator.take_results().len(), 80);
        assert_eq!(sink.opens.load(Ordering::SeqCst), 80);
        assert_eq!(sink.ticks.load(Ordering::SeqCst), 800);
        assert_eq!(sink.max_scanned.load(Ordering::SeqCst), 800);
    }
}
