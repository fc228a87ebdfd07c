//! Core error types for `Statsweep`.

use thiserror::Error;

/// Core error type for `Statsweep` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid field specification.
    #[error("Invalid field spec '{name}': {reason}")]
    InvalidFieldSpec {
        /// Field name.
        name: String,
        /// Why the spec was rejected.
        reason: String,
    },

    /// A metric record without any fields.
    #[error("Metric record for '{tag}' has no fields")]
    EmptyRecord {
        /// Item identifier of the rejected record.
        tag: String,
    },
}
