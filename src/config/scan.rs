//! Immutable scan configuration.
//!
//! Built once with the `with_*` methods, checked by [`ScanConfig::validate`]
//! and then handed by value to the scan coordinator.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{PortSpec, ScanTarget};
use std::time::Duration;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 100;

/// Default per-attempt connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed deadline for the best-effort banner read.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(2);

/// Default capacity of the dispatch queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Retry schedule for failed connection attempts.
///
/// Attempt `i` (zero-indexed) that fails is followed by a wait of
/// `base_delay * 2^i`, except after the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay to wait after failed attempt `attempt`, or `None` if no
    /// attempt follows.
    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            return None;
        }
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        Some(self.base_delay.saturating_mul(factor))
    }

    /// Sum of every backoff wait for a task that never connects.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_attempts)
            .filter_map(|i| self.backoff(i))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Everything the scan coordinator needs to run one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Hosts to scan, in order.
    pub targets: Vec<ScanTarget>,
    /// Ports to scan on every host.
    pub ports: PortSpec,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Per-attempt connect timeout. `None` waits as long as the OS does.
    pub connect_timeout: Option<Duration>,
    /// Whether to attempt a banner read on open ports.
    pub grab_banners: bool,
    /// Deadline for the banner read.
    pub banner_timeout: Duration,
    /// Retry schedule for failed attempts.
    pub retry: RetryPolicy,
    /// Capacity of the dispatch queue.
    pub queue_capacity: usize,
    /// Connection attempts per second across the pool, 0 for unlimited.
    pub rate_limit: u32,
}

impl ScanConfig {
    /// Create a configuration with default settings.
    pub fn new(targets: Vec<ScanTarget>, ports: PortSpec) -> Self {
        Self {
            targets,
            ports,
            workers: DEFAULT_WORKERS,
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            grab_banners: true,
            banner_timeout: BANNER_TIMEOUT,
            retry: RetryPolicy::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            rate_limit: 0,
        }
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the connect timeout. A zero duration disables the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Enable or disable banner reads.
    pub fn with_banners(mut self, enabled: bool) -> Self {
        self.grab_banners = enabled;
        self
    }

    /// Set the banner read deadline.
    pub fn with_banner_timeout(mut self, timeout: Duration) -> Self {
        self.banner_timeout = timeout;
        self
    }

    /// Set the retry schedule.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the dispatch queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Cap connection attempts per second.
    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = rate;
        self
    }

    /// Check the configuration and return the total task count.
    pub fn validate(&self) -> ConfigResult<usize> {
        if self.targets.is_empty() {
            return Err(ConfigError::MissingTarget);
        }
        if self.targets.iter().any(|t| t.as_str().is_empty()) {
            return Err(ConfigError::EmptyTarget);
        }
        if self.ports.is_empty() {
            return Err(ConfigError::NoPorts);
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(0));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy);
        }
        self.total_tasks()
    }

    /// `|targets| x |ports|`.
    pub fn total_tasks(&self) -> ConfigResult<usize> {
        let targets = self.targets.len();
        let ports = self.ports.count();
        targets
            .checked_mul(ports)
            .ok_or(ConfigError::TaskCountOverflow { targets, ports })
    }
}
