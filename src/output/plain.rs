//! Plain text output formatting.
//!
//! Produces a human-readable report with colors and formatting.

use crate::scanner::ScanSummary;
use console::style;
use std::io::{self, Write};

const RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write the report summary.
pub fn write_plain<W: Write>(out: &mut W, summary: &ScanSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style("Report summary.").cyan().bold())?;
    writeln!(
        out,
        "  {} {:.2}s",
        style("Time elapsed:").bold(),
        summary.elapsed.as_secs_f64()
    )?;
    writeln!(
        out,
        "  {} {}",
        style("Total number of ports scanned:").bold(),
        summary.total_ports_scanned()
    )?;

    let results = summary.sorted_results();
    let listed: Vec<String> = results
        .iter()
        .map(|r| r.target.join_port(r.port.as_u16()))
        .collect();
    writeln!(
        out,
        "  {} [ {} ]",
        style("Open ports found:").bold(),
        listed.join(" ")
    )?;

    let with_banner: Vec<_> = results.iter().filter(|r| r.banner.is_some()).collect();
    if !with_banner.is_empty() {
        writeln!(out)?;
        writeln!(out, "  {}", style(RULE).dim())?;
        writeln!(
            out,
            "  {:<28}  {}",
            style("ADDRESS").bold(),
            style("BANNER").bold()
        )?;
        writeln!(out, "  {}", style(RULE).dim())?;

        for result in with_banner {
            let banner = result.banner.as_deref().unwrap_or_default();
            writeln!(
                out,
                "  {:<28}  {}",
                style(result.target.join_port(result.port.as_u16())).green(),
                style(truncate_string(banner, 40)).dim()
            )?;
        }
        writeln!(out, "  {}", style(RULE).dim())?;
    }

    writeln!(out)?;
    Ok(())
}

/// Print the report to stdout.
pub fn print_plain(summary: &ScanSummary) -> io::Result<()> {
    let stdout = io::stdout();
    write_plain(&mut stdout.lock(), summary)
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(targets: usize, ports: usize, workers: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "{} Scanning {} ports on {} target(s) with {} workers...",
        style("•").dim(),
        style(ports).white().bold(),
        style(targets).white().bold(),
        workers
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Truncate a string to a maximum number of characters, adding an ellipsis
/// if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
