//! Paginated listing requests.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::json_path::{resolve, resolve_str};
use crate::request::RequestTemplate;

// ============================================================================
// Listing Spec
// ============================================================================

/// Static parameters of a paginated listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSpec {
    /// Listing endpoint URL.
    pub url: String,
    /// Query parameter naming the collection, e.g. `playlistId`.
    pub collection_param: Option<String>,
    /// Collection identifier sent in `collection_param`.
    pub collection_id: Option<String>,
    /// Query parameter carrying the page size, e.g. `maxResults`.
    pub page_size_param: String,
    /// Requested page size. `None` leaves it to the server.
    pub page_size: Option<u32>,
    /// Query parameter carrying the continuation token, e.g. `pageToken`.
    pub token_param: String,
    /// Path of the continuation token in the response, e.g. `nextPageToken`.
    pub token_path: String,
    /// Path of the item identifiers in the response.
    pub items_path: String,
}

impl ListingSpec {
    /// Creates a listing spec with the conventional parameter names.
    pub fn new(url: impl Into<String>, items_path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            collection_param: None,
            collection_id: None,
            page_size_param: "maxResults".to_string(),
            page_size: None,
            token_param: "pageToken".to_string(),
            token_path: "nextPageToken".to_string(),
            items_path: items_path.into(),
        }
    }

    /// Sets the collection parameter and identifier.
    pub fn with_collection(mut self, param: impl Into<String>, id: impl Into<String>) -> Self {
        self.collection_param = Some(param.into());
        self.collection_id = Some(id.into());
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

// ============================================================================
// Collection Page
// ============================================================================

/// One page of a listing response.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPage {
    /// Parsed response body.
    pub body: Value,
    /// Token for the next page; `None` on the last page.
    pub continuation_token: Option<String>,
}

impl CollectionPage {
    /// Returns true if this is the last page.
    pub fn is_last(&self) -> bool {
        self.continuation_token.is_none()
    }

    /// Extracts the item identifiers found at `items_path`, in page order.
    ///
    /// Entries that are not non-empty strings are skipped and logged.
    pub fn item_identifiers(&self, items_path: &str) -> Vec<String> {
        let Some(resolved) = resolve(&self.body, items_path) else {
            debug!(path = items_path, "No items on page");
            return Vec::new();
        };

        match resolved.as_ref() {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(id) if !id.is_empty() => Some(id.clone()),
                    other => {
                        warn!(path = items_path, value = %other, "Skipping non-string item identifier");
                        None
                    }
                })
                .collect(),
            Value::String(id) if !id.is_empty() => vec![id.clone()],
            other => {
                warn!(path = items_path, value = %other, "Item path did not resolve to identifiers");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Page Fetcher
// ============================================================================

/// Issues single requests against a paginated listing endpoint.
///
/// Never retries; a failed page is returned to the caller as is.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    listing: ListingSpec,
    template: RequestTemplate,
}

impl PageFetcher {
    /// Creates a page fetcher.
    pub fn new(listing: ListingSpec, template: RequestTemplate) -> Self {
        Self { listing, template }
    }

    /// Returns the listing spec.
    pub fn listing(&self) -> &ListingSpec {
        &self.listing
    }

    /// Fetches one page, passing `token` when continuing a listing.
    ///
    /// An empty-string continuation token in the response counts as absent.
    ///
    /// # Errors
    ///
    /// Returns transport, status, and body errors from [`FetchContext::fetch_json`].
    #[instrument(skip(self, ctx), fields(url = %self.listing.url))]
    pub async fn fetch_page(
        &self,
        ctx: &FetchContext,
        token: Option<&str>,
    ) -> Result<CollectionPage, FetchError> {
        let page_size = self.listing.page_size.map(|n| n.to_string());

        let mut params: Vec<(&str, &str)> = Vec::with_capacity(3);
        if let (Some(param), Some(id)) = (&self.listing.collection_param, &self.listing.collection_id) {
            params.push((param.as_str(), id.as_str()));
        }
        if let Some(ref size) = page_size {
            params.push((self.listing.page_size_param.as_str(), size.as_str()));
        }
        if let Some(token) = token {
            params.push((self.listing.token_param.as_str(), token));
        }

        let request = self.template.build(&self.listing.url, &params)?;
        let body = ctx.fetch_json(request).await?;
        let continuation_token = resolve_str(&body, &self.listing.token_path);

        debug!(has_next = continuation_token.is_some(), "Fetched page");
        Ok(CollectionPage {
            body,
            continuation_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_identifiers_from_mapped_path() {
        let page = CollectionPage {
            body: json!({"items": [
                {"snippet": {"resourceId": {"videoId": "a"}}},
                {"snippet": {"resourceId": {"videoId": 5}}},
                {"snippet": {"resourceId": {"videoId": "b"}}}
            ]}),
            continuation_token: None,
        };
        assert_eq!(
            page.item_identifiers("items.#.snippet.resourceId.videoId"),
            vec!["a", "b"]
        );
        assert!(page.is_last());
    }

    #[test]
    fn test_item_identifiers_missing() {
        let page = CollectionPage {
            body: json!({"kind": "empty"}),
            continuation_token: Some("t".to_string()),
        };
        assert!(page.item_identifiers("items.#.id").is_empty());
        assert!(!page.is_last());
    }

    #[test]
    fn test_listing_builder() {
        let listing = ListingSpec::new("https://example.com/list", "items.#.id")
            .with_collection("playlistId", "PL1")
            .with_page_size(50);
        assert_eq!(listing.collection_id.as_deref(), Some("PL1"));
        assert_eq!(listing.page_size, Some(50));
        assert_eq!(listing.token_param, "pageToken");
    }
}
