//! In-memory metric store.
//!
//! Buffers the records emitted by a gather cycle until the caller drains
//! them.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use statsweep_core::{MetricRecord, MetricSink};

// ============================================================================
// Metric Store
// ============================================================================

/// Thread-safe accumulator of metric records.
#[derive(Debug, Default)]
pub struct MetricStore {
    records: RwLock<Vec<MetricRecord>>,
}

impl MetricStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<MetricRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<MetricRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of every stored record, oldest first.
    pub fn records(&self) -> Vec<MetricRecord> {
        self.read().clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes and returns every stored record, oldest first.
    pub fn drain(&self) -> Vec<MetricRecord> {
        let drained = std::mem::take(&mut *self.write());
        if !drained.is_empty() {
            debug!(count = drained.len(), "Drained metric store");
        }
        drained
    }
}

impl MetricSink for MetricStore {
    fn emit(&self, record: MetricRecord) {
        self.write().push(record);
    }
}
