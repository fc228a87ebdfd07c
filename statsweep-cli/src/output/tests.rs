//! CLI output formatting tests.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{use_colors, TextFormatter};
    use statsweep_collect::{GatherReport, ItemError};
    use statsweep_core::{FieldValue, MetricFields, MetricRecord};
    use statsweep_fetch::FetchError;

    fn record() -> MetricRecord {
        let mut fields = MetricFields::new();
        fields.insert("viewCount".to_string(), FieldValue::Integer(42));
        fields.insert("likeCount".to_string(), FieldValue::Integer(7));
        MetricRecord::new("youtube", "videoId", "abc123", fields).unwrap()
    }

    #[test]
    fn test_record_line_sorted_fields() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_record(&record()),
            "videoId=abc123 likeCount=7 viewCount=42"
        );
    }

    #[test]
    fn test_record_line_with_colors() {
        let formatter = TextFormatter::new(true);
        let line = formatter.format_record(&record());
        assert!(line.starts_with("\x1b[1mvideoId=abc123\x1b[0m"));
    }

    #[test]
    fn test_colors_only_on_terminal() {
        assert!(use_colors(false, true));
        assert!(!use_colors(false, false));
        assert!(!use_colors(true, true));

        let piped = TextFormatter::new(use_colors(false, false));
        assert!(!piped.format_record(&record()).contains('\x1b'));
    }

    #[test]
    fn test_clean_report() {
        let report = GatherReport {
            pages: 2,
            identifiers: 3,
            emitted: 3,
            ..GatherReport::default()
        };
        let text = TextFormatter::new(false).format_report(&report);
        assert!(text.starts_with("✓ succeeded with 0 item errors"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_report_lists_item_errors() {
        let report = GatherReport {
            pages: 1,
            identifiers: 2,
            emitted: 1,
            item_errors: vec![ItemError {
                item_id: "bad".to_string(),
                error: FetchError::MalformedNumericField {
                    field: "viewCount".to_string(),
                    path: "stats.viewCount".to_string(),
                    value: "\"n/a\"".to_string(),
                },
            }],
            ..GatherReport::default()
        };
        let text = TextFormatter::new(false).format_report(&report);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("! succeeded with 1 item errors"));
        assert!(lines[1].contains("✗ bad:"));
        assert!(lines[1].contains("viewCount"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{JsonFormatter, ReportOutput};
    use statsweep_collect::{GatherReport, ItemError};
    use statsweep_core::{FieldValue, MetricFields, MetricRecord};
    use statsweep_fetch::FetchError;

    #[test]
    fn test_record_is_one_line() {
        let mut fields = MetricFields::new();
        fields.insert("viewCount".to_string(), FieldValue::Integer(42));
        let record = MetricRecord::new("youtube", "videoId", "abc123", fields).unwrap();

        let json = JsonFormatter::new(false).format(&record).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tag"], "abc123");
        assert_eq!(value["tagKey"], "videoId");
        assert_eq!(value["fields"]["viewCount"], 42);
    }

    #[test]
    fn test_report_output() {
        let report = GatherReport {
            pages: 1,
            identifiers: 2,
            emitted: 1,
            item_errors: vec![ItemError {
                item_id: "x".to_string(),
                error: FetchError::MalformedResponse("empty body".to_string()),
            }],
            ..GatherReport::default()
        };

        let output = ReportOutput::from(&report);
        assert_eq!(output.item_errors.len(), 1);

        let json = JsonFormatter::new(false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["emitted"], 1);
        assert_eq!(value["itemErrors"][0]["itemId"], "x");
        assert!(value["durationMs"].is_number());
    }
}
