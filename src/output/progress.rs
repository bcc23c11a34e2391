//! Live progress display on stderr.

use crate::scanner::{ProgressSink, ScanProgress, ScanResult};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar that also prints open ports as they are found.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a bar for `total` tasks.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }

    /// Create a reporter that draws nothing.
    pub fn hidden(total: usize) -> Self {
        Self {
            bar: ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::hidden()),
        }
    }

    /// Clear the bar once the scan is done.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressSink for ProgressReporter {
    fn on_open(&self, result: &ScanResult) {
        let address = result.target.join_port(result.port.as_u16());
        let line = match &result.banner {
            Some(banner) => format!("[OPEN] {} {}", address, banner),
            None => format!("[OPEN] {}", address),
        };
        self.bar.println(line);
        self.bar.set_message(format!("found {}", address));
    }

    /// Notifications may arrive out of order, so step the bar rather
    /// than jumping to `progress.scanned`.
    fn on_progress(&self, _progress: ScanProgress) {
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_counts_notifications() {
        let reporter = ProgressReporter::hidden(10);
        for scanned in [2, 1, 4, 3] {
            reporter.on_progress(ScanProgress { scanned, total: 10 });
        }
        assert_eq!(reporter.position(), 4);
        reporter.finish();
    }
}
