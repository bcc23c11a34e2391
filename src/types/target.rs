//! Target specification types.
//!
//! A target is an opaque host identifier (IP literal or hostname). Name
//! resolution happens when the connection is dialed, not here.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single host to scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanTarget(String);

impl ScanTarget {
    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join this host with a port in `host:port` form, bracketing IPv6
    /// literals.
    pub fn join_port(&self, port: u16) -> String {
        if self.0.contains(':') {
            format!("[{}]:{}", self.0, port)
        } else {
            format!("{}:{}", self.0, port)
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScanTarget {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// How the targets were given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A single host (`--target`).
    Single(String),
    /// A comma separated host list (`--targets`).
    List(String),
}

impl TargetSpec {
    /// Pick the target source from the two mutually exclusive options.
    pub fn from_options(target: Option<&str>, targets: Option<&str>) -> ConfigResult<Self> {
        let target = target.filter(|s| !s.is_empty());
        let targets = targets.filter(|s| !s.is_empty());

        match (target, targets) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingTargets),
            (Some(t), None) => Ok(Self::Single(t.to_string())),
            (None, Some(list)) => Ok(Self::List(list.to_string())),
            (None, None) => Err(ConfigError::MissingTarget),
        }
    }

    /// Expand into the ordered target list, dropping repeats.
    pub fn resolve(&self) -> ConfigResult<Vec<ScanTarget>> {
        let raw: Vec<&str> = match self {
            Self::Single(host) => vec![host.trim()],
            Self::List(list) => list.split(',').map(str::trim).collect(),
        };

        let mut targets: Vec<ScanTarget> = Vec::with_capacity(raw.len());
        for host in raw {
            if host.is_empty() {
                return Err(ConfigError::EmptyTarget);
            }
            let target = ScanTarget::new(host);
            if !targets.contains(&target) {
                targets.push(target);
            }
        }

        Ok(targets)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(host) => write!(f, "{}", host),
            Self::List(list) => write!(f, "{}", list),
        }
    }
}
