//! Metric output types.
//!
//! - [`FieldValue`] - A single numeric field value
//! - [`MetricRecord`] - One tagged set of fields emitted per collection item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CoreError;

// ============================================================================
// Field Value
// ============================================================================

/// A numeric field value.
///
/// Integers are kept as integers whenever the source representation allows
/// it; everything else is a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Exact integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
}

impl FieldValue {
    /// Returns the value as `f64`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Returns the value as `i64` if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Integer(v) => Some(v),
            Self::Float(_) => None,
        }
    }

    /// Returns true if this is an integer value.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Field name to value mapping carried by a [`MetricRecord`].
pub type MetricFields = BTreeMap<String, FieldValue>;

// ============================================================================
// Metric Record
// ============================================================================

/// One metric record: a tag identifying the collection item plus the
/// numeric fields recovered from its detail document.
///
/// A record always carries at least one field. [`MetricRecord::new`] refuses
/// to build an empty one, and deserializing a record without fields fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RecordRepr")]
pub struct MetricRecord {
    measurement: String,
    tag_key: String,
    tag: String,
    fields: MetricFields,
    timestamp: DateTime<Utc>,
}

/// Unchecked wire form of a [`MetricRecord`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordRepr {
    measurement: String,
    tag_key: String,
    tag: String,
    fields: MetricFields,
    timestamp: DateTime<Utc>,
}

impl TryFrom<RecordRepr> for MetricRecord {
    type Error = CoreError;

    fn try_from(repr: RecordRepr) -> Result<Self, Self::Error> {
        let tag = repr.tag.clone();
        Self::with_timestamp(repr.measurement, repr.tag_key, repr.tag, repr.fields, repr.timestamp)
            .ok_or(CoreError::EmptyRecord { tag })
    }
}

impl MetricRecord {
    /// Creates a record stamped with the current time.
    ///
    /// Returns `None` if `fields` is empty.
    pub fn new(
        measurement: impl Into<String>,
        tag_key: impl Into<String>,
        tag: impl Into<String>,
        fields: MetricFields,
    ) -> Option<Self> {
        Self::with_timestamp(measurement, tag_key, tag, fields, Utc::now())
    }

    /// Creates a record with an explicit timestamp.
    ///
    /// Returns `None` if `fields` is empty.
    pub fn with_timestamp(
        measurement: impl Into<String>,
        tag_key: impl Into<String>,
        tag: impl Into<String>,
        fields: MetricFields,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        if fields.is_empty() {
            return None;
        }
        Some(Self {
            measurement: measurement.into(),
            tag_key: tag_key.into(),
            tag: tag.into(),
            fields,
            timestamp,
        })
    }

    /// Measurement name.
    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// Name of the tag holding the item identifier.
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// The item identifier.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Extracted fields. Never empty.
    pub fn fields(&self) -> &MetricFields {
        &self.fields
    }

    /// When the record was assembled.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Gets a field by name.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).copied()
    }

    /// Number of fields in this record.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
