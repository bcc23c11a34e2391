//! # portsweep - A Concurrent TCP Connect Scanner
//!
//! Given one or more hosts and a set of ports, portsweep finds which ports
//! accept a TCP connection, optionally captures the first bytes the service
//! sends, and reports the open ports with timing and progress.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::config::ScanConfig;
//! use portsweep::scanner::{targets, ScanCoordinator};
//! use portsweep::types::{Port, PortRange, PortSpec};
//!
//! #[tokio::main]
//! async fn main() {
//!     let range = PortRange::new(Port::new(8080), Port::new(8082)).unwrap();
//!     let config = ScanConfig::new(targets(["127.0.0.1"]), PortSpec::from_range(range));
//!
//!     let summary = ScanCoordinator::new(config).unwrap().run().await.unwrap();
//!     for result in &summary.results {
//!         println!("{}:{} is {}", result.target, result.port, result.status);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port specifications and targets
//! - [`config`] - Immutable scan configuration and user settings
//! - [`scanner`] - Task source, dispatch queue, worker pool, aggregator and
//!   coordinator
//! - [`banner`] - Best-effort banner reads
//! - [`output`] - Plain text and JSON reports, live progress
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use config::ScanConfig;
pub use error::{CliError, ConfigError, ScanError};
pub use scanner::{PortStatus, ScanCoordinator, ScanResult, ScanSummary, Scanner};
pub use types::{Port, PortSpec, ScanTarget, TargetSpec};
