//! Text output formatting.

use statsweep_collect::GatherReport;
use statsweep_core::MetricRecord;
use std::io::IsTerminal;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Returns true if output to a stream should carry ANSI colors.
pub fn use_colors(no_color: bool, stream_is_terminal: bool) -> bool {
    !no_color && stream_is_terminal
}

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Creates a formatter for stdout, colored only on a terminal.
    pub fn for_stdout(no_color: bool) -> Self {
        Self::new(use_colors(no_color, std::io::stdout().is_terminal()))
    }

    /// Creates a formatter for stderr, colored only on a terminal.
    pub fn for_stderr(no_color: bool) -> Self {
        Self::new(use_colors(no_color, std::io::stderr().is_terminal()))
    }

    /// Formats a record as `tag_key=tag field=value ...`.
    pub fn format_record(&self, record: &MetricRecord) -> String {
        let mut line = self.bold(&format!("{}={}", record.tag_key(), record.tag()));
        for (name, value) in record.fields() {
            line.push(' ');
            line.push_str(&format!("{name}={value}"));
        }
        line
    }

    /// Formats the summary of a gather cycle, one line per failed item.
    pub fn format_report(&self, report: &GatherReport) -> String {
        let mut lines = Vec::with_capacity(report.item_errors.len() + 1);

        let (mark, color) = if report.is_clean() {
            ("✓", GREEN)
        } else {
            ("!", YELLOW)
        };
        lines.push(format!("{} {report}", self.color(mark, color)));

        if report.empty > 0 {
            lines.push(self.dim(&format!(
                "  {} items had none of the configured fields",
                report.empty
            )));
        }
        for item in &report.item_errors {
            lines.push(format!("  {} {item}", self.color("✗", RED)));
        }

        lines.join("\n")
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.color(text, BOLD)
    }

    fn dim(&self, text: &str) -> String {
        self.color(text, DIM)
    }
}
