//! Per-item detail requests.

use serde_json::Value;
use tracing::instrument;

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::request::RequestTemplate;

/// Static parameters of the per-item detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSpec {
    /// Detail endpoint URL.
    pub url: String,
    /// Query parameter carrying the item identifier, e.g. `id`.
    pub id_param: String,
}

impl DetailSpec {
    /// Creates a detail spec.
    pub fn new(url: impl Into<String>, id_param: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id_param: id_param.into(),
        }
    }
}

/// Fetches the detail document of a single item.
#[derive(Debug, Clone)]
pub struct DetailFetcher {
    spec: DetailSpec,
    template: RequestTemplate,
}

impl DetailFetcher {
    /// Creates a detail fetcher.
    pub fn new(spec: DetailSpec, template: RequestTemplate) -> Self {
        Self { spec, template }
    }

    /// Fetches and parses the detail document for `item_id`.
    ///
    /// # Errors
    ///
    /// Returns transport, status, and body errors from [`FetchContext::fetch_json`].
    #[instrument(skip(self, ctx))]
    pub async fn fetch_detail(&self, ctx: &FetchContext, item_id: &str) -> Result<Value, FetchError> {
        let request = self
            .template
            .build(&self.spec.url, &[(self.spec.id_param.as_str(), item_id)])?;
        ctx.fetch_json(request).await
    }
}
