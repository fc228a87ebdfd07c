// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Statsweep Fetch
//!
//! Network plumbing for the Statsweep collector.
//!
//! ## Transport
//!
//! - [`transport::Transport`] - Trait for issuing one HTTP request
//! - [`host::http::HttpTransport`] - reqwest-backed transport with tracing and domain allowlist
//! - [`context::FetchContext`] - Bundles a transport with the timeout and cancellation token
//!
//! ## Fetchers
//!
//! - [`page::PageFetcher`] - One request against a paginated listing endpoint
//! - [`detail::DetailFetcher`] - One request against the per-item detail endpoint
//!
//! ## JSON helpers
//!
//! - [`body`] - BOM stripping and body parsing
//! - [`json_path`] - Dot-path evaluation over `serde_json::Value`
//!
//! ## Example
//!
//! ```ignore
//! use statsweep_fetch::{FetchContext, ListingSpec, PageFetcher, RequestTemplate};
//!
//! let ctx = FetchContext::builder().timeout(Duration::from_secs(5)).build()?;
//! let fetcher = PageFetcher::new(listing, RequestTemplate::default());
//! let page = fetcher.fetch_page(&ctx, None).await?;
//! println!("next token: {:?}", page.continuation_token);
//! ```

pub mod body;
pub mod context;
pub mod detail;
pub mod error;
pub mod host;
pub mod json_path;
pub mod page;
pub mod request;
pub mod transport;

// Errors
pub use error::FetchError;

// Host APIs
pub use host::http::HttpTransport;

// Transport & context
pub use context::{FetchContext, FetchContextBuilder};
pub use request::RequestTemplate;
pub use transport::{ApiRequest, Method, RawResponse, Transport};

// Fetchers
pub use detail::{DetailFetcher, DetailSpec};
pub use page::{CollectionPage, ListingSpec, PageFetcher};

pub use tokio_util::sync::CancellationToken;
