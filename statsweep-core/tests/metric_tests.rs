//! Integration tests for core metric types.

use statsweep_core::{FieldValue, MetricFields, MetricRecord, MetricSink};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct VecSink(Mutex<Vec<MetricRecord>>);

impl MetricSink for VecSink {
    fn emit(&self, record: MetricRecord) {
        self.0.lock().unwrap().push(record);
    }
}

#[test]
fn test_sink_through_arc() {
    let sink = Arc::new(VecSink::default());
    let dyn_sink: Arc<dyn MetricSink> = sink.clone();

    let mut fields = MetricFields::new();
    fields.insert("viewCount".to_string(), FieldValue::Integer(1));
    dyn_sink.emit(MetricRecord::new("m", "id", "a", fields).unwrap());

    assert_eq!(sink.0.lock().unwrap().len(), 1);
}

#[test]
fn test_record_requires_fields() {
    let record = MetricRecord::new("m", "id", "a", MetricFields::new());
    assert!(record.is_none());
}
