// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Statsweep Collect
//!
//! The traversal and flattening engine.
//!
//! ## Stages
//!
//! - [`walker::CollectionWalker`] - Follows continuation tokens and gathers item identifiers
//! - [`assembler::MetricAssembler`] - Fetches one item's detail document and builds its record
//! - [`extract`] - Tolerant numeric extraction of a single field
//! - [`gather::Collector`] - Runs a full cycle and reports per-item failures
//!
//! ## Example
//!
//! ```ignore
//! use statsweep_collect::{CollectionWalker, Collector, MetricAssembler};
//!
//! let collector = Collector::new(walker, assembler).with_concurrency(4);
//! let report = collector.gather(&ctx, &store).await?;
//! println!("{report}");
//! ```

pub mod assembler;
pub mod extract;
pub mod gather;
pub mod walker;

#[cfg(test)]
mod test_support;

pub use assembler::MetricAssembler;
pub use extract::{extract_field, extract_path};
pub use gather::{Collector, GatherReport, ItemError};
pub use walker::{CollectionWalker, Walk, DEFAULT_MAX_PAGES};
