//! Port types with validation and parsing.
//!
//! `Port` covers the full `0..=65535` range; port 0 is passed through
//! untouched. `PortRange` is an inclusive range and `PortSpec` combines an
//! optional range with an explicit list of extra ports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A network port number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 0;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    #[inline]
    pub const fn new(port: u16) -> Self {
        Self(port)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Port {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl TryFrom<i64> for Port {
    type Error = PortError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .map(Self)
            .map_err(|_| PortError::OutOfRange(value))
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value: i64 = s
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        Self::try_from(value)
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port {0}: ports must be between 0 and 65535")]
    OutOfRange(i64),
    #[error("invalid port number: {0:?}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
}

/// A range of ports (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start.0 > end.0 {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// A valid range always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub const fn contains(&self, port: Port) -> bool {
        port.0 >= self.start.0 && port.0 <= self.end.0
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> + Clone {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// The ports to scan on every target.
///
/// Iteration yields every port of the range first, then the explicit
/// ports in the order given. Explicit ports already covered by the range,
/// or repeated within the list, are dropped on insertion so every port is
/// yielded once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortSpec {
    range: Option<PortRange>,
    explicit: Vec<Port>,
}

impl PortSpec {
    /// Create an empty port specification.
    pub const fn new() -> Self {
        Self {
            range: None,
            explicit: Vec::new(),
        }
    }

    /// Create a specification holding only a contiguous range.
    pub fn from_range(range: PortRange) -> Self {
        Self {
            range: Some(range),
            explicit: Vec::new(),
        }
    }

    /// Set the contiguous range, dropping explicit ports it now covers.
    pub fn with_range(mut self, range: PortRange) -> Self {
        self.explicit.retain(|p| !range.contains(*p));
        self.range = Some(range);
        self
    }

    /// Append an explicit port unless it is already covered.
    pub fn add_port(&mut self, port: Port) {
        if !self.contains(port) {
            self.explicit.push(port);
        }
    }

    /// Append several explicit ports.
    pub fn with_ports(mut self, ports: impl IntoIterator<Item = Port>) -> Self {
        for port in ports {
            self.add_port(port);
        }
        self
    }

    pub fn range(&self) -> Option<PortRange> {
        self.range
    }

    pub fn explicit(&self) -> &[Port] {
        &self.explicit
    }

    pub fn contains(&self, port: Port) -> bool {
        self.range.is_some_and(|r| r.contains(port)) || self.explicit.contains(&port)
    }

    /// Total number of ports, `|range| + |explicit|`.
    pub fn count(&self) -> usize {
        self.range.map_or(0, |r| r.len()) + self.explicit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The port at position `index` in iteration order.
    pub fn get(&self, index: usize) -> Option<Port> {
        let range_len = self.range.map_or(0, |r| r.len());
        match self.range {
            Some(r) if index < range_len => Some(Port(r.start.0 + index as u16)),
            _ => self.explicit.get(index - range_len).copied(),
        }
    }

    /// Iterate range ports first, then explicit ports.
    pub fn iter(&self) -> impl Iterator<Item = Port> + Clone + '_ {
        self.range
            .iter()
            .flat_map(|r| r.iter())
            .chain(self.explicit.iter().copied())
    }
}

/// Parse a comma separated port list such as `"22,80,443"`.
///
/// Whitespace around items is ignored; empty items are rejected.
pub fn parse_port_list(s: &str) -> Result<Vec<Port>, PortError> {
    s.split(',').map(str::parse).collect()
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.range.iter().map(|r| r.to_string()).collect();
        parts.extend(self.explicit.iter().map(|p| p.to_string()));
        write!(f, "{}", parts.join(","))
    }
}
