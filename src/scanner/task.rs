//! Task generation over the target x port space.

use crate::types::{Port, PortSpec, ScanTarget};
use std::fmt;

/// One `(target, port)` unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanTask {
    target: ScanTarget,
    port: Port,
}

impl ScanTask {
    pub fn new(target: ScanTarget, port: Port) -> Self {
        Self { target, port }
    }

    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    pub fn port(&self) -> Port {
        self.port
    }

    /// Connection address in `host:port` form.
    pub fn address(&self) -> String {
        self.target.join_port(self.port.as_u16())
    }
}

impl fmt::Display for ScanTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

/// Lazy, single-use generator of scan tasks.
///
/// For each target in order, yields every port of the range and then every
/// explicit port. Consuming the source exhausts it; a new scan builds a new
/// source.
#[derive(Debug)]
pub struct TaskSource {
    targets: Vec<ScanTarget>,
    ports: PortSpec,
    ports_per_target: usize,
    next: usize,
    total: usize,
}

impl TaskSource {
    pub fn new(targets: Vec<ScanTarget>, ports: PortSpec) -> Self {
        let ports_per_target = ports.count();
        let total = targets.len().saturating_mul(ports_per_target);
        Self {
            targets,
            ports,
            ports_per_target,
            next: 0,
            total,
        }
    }

    /// Number of tasks the source produces in total.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Iterator for TaskSource {
    type Item = ScanTask;

    fn next(&mut self) -> Option<ScanTask> {
        if self.next >= self.total {
            return None;
        }

        let target = &self.targets[self.next / self.ports_per_target];
        let port = self.ports.get(self.next % self.ports_per_target)?;
        self.next += 1;

        Some(ScanTask::new(target.clone(), port))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TaskSource {}
