//! Command-line interface definitions for portsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing. Raw values
//! are validated here and turned into an immutable [`ScanConfig`].

use crate::config::{AppSettings, ScanConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputFormat;
use crate::types::{parse_port_list, Port, PortRange, PortSpec, TargetSpec};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default range scanned when no explicit port list is given.
const DEFAULT_START_PORT: u16 = 1;
const DEFAULT_END_PORT: u16 = 1024;

/// A concurrent TCP connect scanner.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find open TCP ports with a bounded worker pool", long_about = None)]
pub struct Args {
    /// IP address or hostname to scan
    #[arg(long, value_name = "HOST")]
    pub target: Option<String>,

    /// Comma separated list of IP addresses or hostnames to scan
    #[arg(long, value_name = "HOSTS")]
    pub targets: Option<String>,

    /// First port of the range (0-65535)
    #[arg(long = "start-port", value_name = "PORT", allow_hyphen_values = true)]
    pub start_port: Option<String>,

    /// Last port of the range (0-65535)
    #[arg(long = "end-port", value_name = "PORT", allow_hyphen_values = true)]
    pub end_port: Option<String>,

    /// Comma separated list of extra ports (e.g. "22,80,443")
    #[arg(short, long, value_name = "PORTS", allow_hyphen_values = true)]
    pub ports: Option<String>,

    /// Connection timeout per attempt in seconds (0 disables it)
    #[arg(short = 't', long, allow_hyphen_values = true)]
    pub timeout: Option<i64>,

    /// Number of concurrent workers
    #[arg(short = 'w', long, allow_hyphen_values = true)]
    pub workers: Option<i64>,

    /// Maximum connection attempts per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// Do not try to read a banner from open ports
    #[arg(long)]
    pub no_banner: bool,

    /// Output format for results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress progress display and non-error logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a settings file (defaults to the XDG config directory)
    #[arg(long, value_name = "PATH", env = "PORTSWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// The effective output format.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Load settings from `--config` or the default location.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        match &self.config {
            Some(path) => AppSettings::load_from(path),
            None => AppSettings::load(),
        }
    }

    /// Validate the arguments and build the scan configuration.
    ///
    /// Flags take precedence over `settings`.
    pub fn to_config(&self, settings: &AppSettings) -> ConfigResult<ScanConfig> {
        let targets =
            TargetSpec::from_options(self.target.as_deref(), self.targets.as_deref())?.resolve()?;
        let ports = self.port_spec()?;

        let workers = match self.workers {
            Some(n) if n <= 0 => return Err(ConfigError::InvalidWorkerCount(n)),
            Some(n) => usize::try_from(n).map_err(|_| ConfigError::InvalidWorkerCount(n))?,
            None => settings.default_workers,
        };

        let timeout_secs = match self.timeout {
            Some(t) if t < 0 => return Err(ConfigError::InvalidTimeout(t)),
            Some(t) => t.unsigned_abs(),
            None => settings.default_timeout_secs,
        };

        let config = ScanConfig::new(targets, ports)
            .with_workers(workers)
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_banners(settings.grab_banners && !self.no_banner)
            .with_queue_capacity(settings.queue_capacity)
            .with_rate_limit(self.rate_limit.unwrap_or(settings.default_rate_limit));

        config.validate()?;
        Ok(config)
    }

    /// Combine the range flags and the explicit list.
    ///
    /// Without `--ports` the range defaults to 1-1024. With `--ports` a
    /// range is only scanned when both bounds are given.
    fn port_spec(&self) -> ConfigResult<PortSpec> {
        let start = self.start_port.as_deref().map(str::parse::<Port>).transpose()?;
        let end = self.end_port.as_deref().map(str::parse::<Port>).transpose()?;

        let range = match (&self.ports, start, end) {
            (_, Some(start), Some(end)) => Some(PortRange::new(start, end)?),
            (None, start, end) => Some(PortRange::new(
                start.unwrap_or(Port::new(DEFAULT_START_PORT)),
                end.unwrap_or(Port::new(DEFAULT_END_PORT)),
            )?),
            (Some(_), None, None) => None,
            (Some(_), _, _) => return Err(ConfigError::IncompleteRange),
        };

        let mut spec = range.map(PortSpec::from_range).unwrap_or_default();
        if let Some(list) = &self.ports {
            spec = spec.with_ports(parse_port_list(list)?);
        }

        if spec.is_empty() {
            return Err(ConfigError::NoPorts);
        }
        Ok(spec)
    }
}
