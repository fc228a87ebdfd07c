//! The gather cycle.
//!
//! One cycle walks the listing, then assembles and emits a record for every
//! identifier found. Walk failures abort the cycle, and so do transport,
//! status, and timeout failures while fetching details. Failures that only
//! concern one item's data are collected into the [`GatherReport`] and never
//! stop sibling items.

use futures::stream::{self, StreamExt};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

use statsweep_core::MetricSink;
use statsweep_fetch::{FetchContext, FetchError};

use crate::assembler::MetricAssembler;
use crate::walker::CollectionWalker;

// ============================================================================
// Report
// ============================================================================

/// A failure scoped to a single item.
#[derive(Debug)]
pub struct ItemError {
    /// The item that failed.
    pub item_id: String,
    /// What went wrong.
    pub error: FetchError,
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_id, self.error)
    }
}

/// Outcome of a successful gather cycle.
#[derive(Debug, Default)]
pub struct GatherReport {
    /// Listing pages fetched.
    pub pages: usize,
    /// Unique identifiers found by the walk.
    pub identifiers: usize,
    /// Records handed to the sink.
    pub emitted: usize,
    /// Items whose detail document had none of the configured fields.
    pub empty: usize,
    /// Per-item failures.
    pub item_errors: Vec<ItemError>,
    /// Wall time of the cycle.
    pub duration: Duration,
}

impl GatherReport {
    /// Returns true if every item was processed without error.
    pub fn is_clean(&self) -> bool {
        self.item_errors.is_empty()
    }
}

impl fmt::Display for GatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "succeeded with {} item errors ({} records from {} items over {} pages in {:.2?})",
            self.item_errors.len(),
            self.emitted,
            self.identifiers,
            self.pages,
            self.duration
        )
    }
}

// ============================================================================
// Collector
// ============================================================================

/// Runs gather cycles.
#[derive(Debug, Clone)]
pub struct Collector {
    walker: CollectionWalker,
    assembler: MetricAssembler,
    detail_concurrency: usize,
}

impl Collector {
    /// Creates a collector that assembles items one at a time.
    pub fn new(walker: CollectionWalker, assembler: MetricAssembler) -> Self {
        Self {
            walker,
            assembler,
            detail_concurrency: 1,
        }
    }

    /// Sets how many detail requests may be in flight at once.
    pub fn with_concurrency(mut self, detail_concurrency: usize) -> Self {
        self.detail_concurrency = detail_concurrency.max(1);
        self
    }

    /// Returns the collection walker.
    pub fn walker(&self) -> &CollectionWalker {
        &self.walker
    }

    /// Returns the metric assembler.
    pub fn assembler(&self) -> &MetricAssembler {
        &self.assembler
    }

    /// Runs one gather cycle, emitting records to `sink`.
    ///
    /// Records are emitted as soon as each item is assembled. With a
    /// concurrency above one their order is unspecified. Records emitted
    /// before an aborting error stay with the sink.
    ///
    /// # Errors
    ///
    /// - any walk error (the cycle emits nothing)
    /// - any detail error that is not item-scoped (see
    ///   [`FetchError::is_item_scoped`]); no further detail requests are sent
    /// - `FetchError::Cancelled` if the context is cancelled mid-cycle
    #[instrument(skip(self, ctx, sink), fields(concurrency = self.detail_concurrency))]
    pub async fn gather(
        &self,
        ctx: &FetchContext,
        sink: &dyn MetricSink,
    ) -> Result<GatherReport, FetchError> {
        let started = Instant::now();
        let walk = self.walker.walk(ctx).await?;

        let mut report = GatherReport {
            pages: walk.pages,
            identifiers: walk.identifiers.len(),
            ..GatherReport::default()
        };

        let parallel = self.detail_concurrency > 1;
        let assembler = &self.assembler;
        let mut results = stream::iter(walk.identifiers)
            .map(move |id| async move {
                let outcome = assembler.assemble(ctx, &id).await;
                (id, outcome)
            })
            .buffer_unordered(self.detail_concurrency);

        while let Some((item_id, outcome)) = results.next().await {
            if ctx.is_cancelled() {
                info!(emitted = report.emitted, "Gather cancelled");
                return Err(FetchError::Cancelled);
            }

            match outcome {
                Ok(Some(record)) => {
                    sink.emit(record);
                    report.emitted += 1;
                }
                Ok(None) => report.empty += 1,
                Err(error) if error.is_item_scoped(parallel) => {
                    warn!(item_id = %item_id, error = %error, "Item failed");
                    report.item_errors.push(ItemError { item_id, error });
                }
                Err(error) => {
                    error!(
                        item_id = %item_id,
                        error = %error,
                        emitted = report.emitted,
                        "Gather aborted"
                    );
                    return Err(error);
                }
            }
        }

        report.duration = started.elapsed();
        info!(
            pages = report.pages,
            items = report.identifiers,
            emitted = report.emitted,
            empty = report.empty,
            item_errors = report.item_errors.len(),
            "Gather complete"
        );
        Ok(report)
    }
}
