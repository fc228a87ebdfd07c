//! Domain models for Statsweep.
//!
//! ## Submodules
//!
//! - [`field`] - Field configuration (`FieldSpec`)
//! - [`metric`] - Output types (`FieldValue`, `MetricRecord`)

mod field;
mod metric;

pub use field::FieldSpec;
pub use metric::{FieldValue, MetricFields, MetricRecord};
