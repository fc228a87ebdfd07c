// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `Statsweep` Core
//!
//! Core types, models, and traits shared by all `Statsweep` crates.
//!
//! This crate provides:
//!
//! - Domain models (field specs, numeric field values, metric records)
//! - Error types
//! - The [`MetricSink`] trait implemented by metric accumulators
//!
//! ## Key Types
//!
//! - [`FieldSpec`] - A metric field name plus the JSON path it is read from
//! - [`FieldValue`] - Integer or floating point value of a single field
//! - [`MetricRecord`] - One tagged set of numeric fields with a timestamp
//! - [`MetricFields`] - The field mapping carried by a record

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{FieldSpec, FieldValue, MetricFields, MetricRecord};

// Re-export traits
pub use traits::MetricSink;
