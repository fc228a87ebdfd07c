//! Metric assembler.
//!
//! Turns one item identifier into at most one [`MetricRecord`]: fetch the
//! detail document, run the extractor for every configured field, and build
//! a record from whatever was recovered.

use serde_json::Value;
use tracing::{debug, instrument};

use statsweep_core::{FieldSpec, MetricFields, MetricRecord};
use statsweep_fetch::{DetailFetcher, FetchContext, FetchError};

use crate::extract::extract_field;

/// Builds metric records from per-item detail documents.
#[derive(Debug, Clone)]
pub struct MetricAssembler {
    fetcher: DetailFetcher,
    fields: Vec<FieldSpec>,
    measurement: String,
    tag_key: String,
}

impl MetricAssembler {
    /// Creates an assembler.
    pub fn new(
        fetcher: DetailFetcher,
        fields: Vec<FieldSpec>,
        measurement: impl Into<String>,
        tag_key: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            fields,
            measurement: measurement.into(),
            tag_key: tag_key.into(),
        }
    }

    /// Returns the configured fields.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Fetches the item's detail document and assembles its record.
    ///
    /// Returns `Ok(None)` when none of the configured fields are present.
    ///
    /// # Errors
    ///
    /// Returns the detail fetch error, or the first malformed field.
    #[instrument(skip(self, ctx))]
    pub async fn assemble(
        &self,
        ctx: &FetchContext,
        item_id: &str,
    ) -> Result<Option<MetricRecord>, FetchError> {
        let document = self.fetcher.fetch_detail(ctx, item_id).await?;
        self.record_from(item_id, &document)
    }

    /// Assembles a record from an already fetched detail document.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MalformedNumericField` for the first field that
    /// is present but not numeric.
    pub fn record_from(
        &self,
        item_id: &str,
        document: &Value,
    ) -> Result<Option<MetricRecord>, FetchError> {
        let mut fields = MetricFields::new();
        for spec in &self.fields {
            if let Some(value) = extract_field(document, spec)? {
                fields.insert(spec.name.clone(), value);
            }
        }

        if fields.is_empty() {
            debug!(item_id, "No fields recovered, skipping item");
            return Ok(None);
        }

        Ok(MetricRecord::new(
            self.measurement.as_str(),
            self.tag_key.as_str(),
            item_id,
            fields,
        ))
    }
}
