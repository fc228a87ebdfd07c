// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Statsweep Store
//!
//! Configuration and record storage for Statsweep.
//!
//! This crate provides:
//!
//! - **CollectorConfig**: TOML configuration, validation, and collector construction
//! - **MetricStore**: In-memory metric sink that buffers one cycle's records
//!
//! ## Usage
//!
//! ```ignore
//! use statsweep_store::{CollectorConfig, MetricStore};
//! use statsweep_fetch::CancellationToken;
//!
//! let config = CollectorConfig::load()?;
//! let collector = config.build_collector()?;
//! let ctx = config.fetch_context(CancellationToken::new())?;
//!
//! let store = MetricStore::new();
//! let report = collector.gather(&ctx, &store).await?;
//! println!("{report}: {} records", store.len());
//! ```

pub mod config;
pub mod error;
pub mod metric_store;

pub use config::{CollectorConfig, DetailConfig, ListingConfig};
pub use error::StoreError;
pub use metric_store::MetricStore;
