//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use statsweep_collect::GatherReport;

// ============================================================================
// Output Types
// ============================================================================

/// JSON summary of a gather cycle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput {
    pub pages: usize,
    pub identifiers: usize,
    pub emitted: usize,
    pub empty: usize,
    pub duration_ms: u128,
    pub item_errors: Vec<ItemErrorOutput>,
}

/// A single failed item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemErrorOutput {
    pub item_id: String,
    pub error: String,
}

impl From<&GatherReport> for ReportOutput {
    fn from(report: &GatherReport) -> Self {
        Self {
            pages: report.pages,
            identifiers: report.identifiers,
            emitted: report.emitted,
            empty: report.empty,
            duration_ms: report.duration.as_millis(),
            item_errors: report
                .item_errors
                .iter()
                .map(|e| ItemErrorOutput {
                    item_id: e.item_id.clone(),
                    error: e.error.to_string(),
                })
                .collect(),
        }
    }
}

/// Identifiers found by a walk.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdsOutput<'a> {
    pub pages: usize,
    pub duplicates: usize,
    pub identifiers: &'a [String],
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a gather report.
    pub fn format_report(&self, report: &GatherReport) -> Result<String> {
        self.format(&ReportOutput::from(report))
    }
}
