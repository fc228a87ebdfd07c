//! Trait definitions for Statsweep.

use crate::models::MetricRecord;

/// Downstream accumulator for metric records.
///
/// Implementors receive records from concurrently running item tasks, so
/// `emit` must tolerate concurrent calls and makes no ordering promise.
/// Emission never fails from the caller's point of view; an implementation
/// that can fail internally must log and swallow the failure itself.
pub trait MetricSink: Send + Sync {
    /// Appends one record.
    fn emit(&self, record: MetricRecord);
}

impl<S: MetricSink + ?Sized> MetricSink for std::sync::Arc<S> {
    fn emit(&self, record: MetricRecord) {
        (**self).emit(record);
    }
}

impl<S: MetricSink + ?Sized> MetricSink for &S {
    fn emit(&self, record: MetricRecord) {
        (**self).emit(record);
    }
}
