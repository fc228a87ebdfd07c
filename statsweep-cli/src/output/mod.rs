//! Output formatting for CLI.

mod json;
mod text;

pub use json::{IdsOutput, JsonFormatter};
pub use text::TextFormatter;

use statsweep_core::{MetricRecord, MetricSink};
use std::io::Write;
use tracing::warn;

use crate::{Cli, OutputFormat};

/// Sink that prints each record as one line on stdout as soon as it is
/// emitted.
pub struct RecordWriter {
    format: OutputFormat,
    text: TextFormatter,
    json: JsonFormatter,
}

impl RecordWriter {
    /// Creates a writer for the CLI's output settings.
    pub fn new(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            text: TextFormatter::for_stdout(cli.no_color),
            // One record per line, whatever --pretty says.
            json: JsonFormatter::new(false),
        }
    }

    /// Formats one record as a line.
    pub fn line(&self, record: &MetricRecord) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.text.format_record(record)),
            OutputFormat::Json => self.json.format(record),
        }
    }
}

impl MetricSink for RecordWriter {
    fn emit(&self, record: MetricRecord) {
        let line = match self.line(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!(tag = %record.tag(), error = %e, "Failed to format record");
                return;
            }
        };
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}") {
            warn!(error = %e, "Failed to write record");
        }
    }
}

#[cfg(test)]
mod tests;
