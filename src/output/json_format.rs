//! JSON output formatting.

use crate::scanner::{ScanResult, ScanSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

/// The JSON document written for a finished scan.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub started_at: DateTime<Utc>,
    /// Elapsed seconds, e.g. `"1.23s"`.
    pub elapsed_time: String,
    pub total_ports_scanned: usize,
    pub open_ports: &'a [ScanResult],
}

impl<'a> JsonReport<'a> {
    pub fn new(summary: &'a ScanSummary) -> Self {
        Self {
            started_at: summary.started_at,
            elapsed_time: format!("{:.2}s", summary.elapsed.as_secs_f64()),
            total_ports_scanned: summary.total_ports_scanned(),
            open_ports: &summary.results,
        }
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, summary: &ScanSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonReport::new(summary))?;
    writeln!(out)
}

/// Print the report to stdout.
pub fn print_json(summary: &ScanSummary) -> io::Result<()> {
    let stdout = io::stdout();
    write_json(&mut stdout.lock(), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{ScanProgress, ScanTask};
    use crate::types::{Port, ScanTarget};
    use std::time::Duration;

    #[test]
    fn test_json_document_shape() {
        let task = ScanTask::new(ScanTarget::new("127.0.0.1"), Port::new(8081));
        let summary = ScanSummary {
            started_at: Utc::now(),
            elapsed: Duration::from_millis(1234),
            progress: ScanProgress { scanned: 3, total: 3 },
            results: vec![ScanResult::open(&task, Some("hello".to_string()))],
        };

        let mut buf = Vec::new();
        write_json(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["elapsed_time"], "1.23s");
        assert_eq!(value["total_ports_scanned"], 3);
        assert_eq!(
            value["open_ports"],
            serde_json::json!([
                { "target": "127.0.0.1", "port": 8081, "status": "open", "banner": "hello" }
            ])
        );
        assert!(value["started_at"].is_string());
    }
}
