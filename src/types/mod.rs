//! Core type definitions using newtype patterns for type safety.

mod port;
mod target;

pub use port::{parse_port_list, Port, PortError, PortRange, PortSpec};
pub use target::{ScanTarget, TargetSpec};
