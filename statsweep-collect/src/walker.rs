//! Collection walker.
//!
//! Follows continuation tokens until the listing is exhausted and returns
//! every item identifier it saw.
//!
//! The walk is pre-order: each page's identifiers are appended before the
//! next page is requested, so the result is in page-sequence order. A failed
//! page anywhere in the chain fails the whole walk and nothing collected so
//! far is returned.

use std::collections::HashSet;
use tracing::{debug, info, instrument};

use statsweep_fetch::{FetchContext, FetchError, PageFetcher};

/// Default upper bound on pages per walk.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Identifiers collected by one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walk {
    /// Unique identifiers in page-sequence order.
    pub identifiers: Vec<String>,
    /// Number of pages fetched.
    pub pages: usize,
    /// Identifiers dropped because an earlier page already listed them.
    pub duplicates: usize,
}

/// Walks a paginated listing.
#[derive(Debug, Clone)]
pub struct CollectionWalker {
    fetcher: PageFetcher,
    max_pages: usize,
}

impl CollectionWalker {
    /// Creates a walker with the default page limit.
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Sets the maximum number of pages fetched per walk.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Returns the page limit.
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Walks the listing from the first page.
    ///
    /// # Errors
    ///
    /// - `FetchError::PaginationLimit` if more than `max_pages` pages are needed
    /// - any error from fetching a page
    #[instrument(skip(self, ctx), fields(max_pages = self.max_pages))]
    pub async fn walk(&self, ctx: &FetchContext) -> Result<Walk, FetchError> {
        let items_path = &self.fetcher.listing().items_path;
        let mut walk = Walk::default();
        let mut seen = HashSet::new();
        let mut token: Option<String> = None;

        loop {
            if walk.pages >= self.max_pages {
                return Err(FetchError::PaginationLimit {
                    max_pages: self.max_pages,
                });
            }

            let page = self.fetcher.fetch_page(ctx, token.as_deref()).await?;
            walk.pages += 1;

            let ids = page.item_identifiers(items_path);
            debug!(page = walk.pages, items = ids.len(), "Page walked");
            for id in ids {
                if seen.insert(id.clone()) {
                    walk.identifiers.push(id);
                } else {
                    walk.duplicates += 1;
                }
            }

            match page.continuation_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        info!(
            pages = walk.pages,
            items = walk.identifiers.len(),
            duplicates = walk.duplicates,
            "Walk complete"
        );
        Ok(walk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTransport;
    use statsweep_fetch::{ListingSpec, RequestTemplate};
    use std::sync::Arc;

    fn walker(transport: &Arc<ScriptedTransport>) -> (CollectionWalker, FetchContext) {
        let listing = ListingSpec::new("https://api.example.com/list", "items.#.id");
        let walker = CollectionWalker::new(PageFetcher::new(listing, RequestTemplate::default()));
        let ctx = FetchContext::new(transport.clone());
        (walker, ctx)
    }

    #[tokio::test]
    async fn test_single_page_no_recursion() {
        let transport = Arc::new(
            ScriptedTransport::new().page(None, r#"{"items":[{"id":"a"},{"id":"b"}]}"#),
        );
        let (walker, ctx) = walker(&transport);

        let walk = walker.walk(&ctx).await.unwrap();
        assert_eq!(walk.identifiers, vec!["a", "b"]);
        assert_eq!(walk.pages, 1);
        assert_eq!(transport.requests(), 1);
    }

    #[tokio::test]
    async fn test_chain_issues_one_fetch_per_page() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .page(None, r#"{"items":[{"id":"a"},{"id":"b"}],"nextPageToken":"page2"}"#)
                .page(Some("page2"), r#"{"items":[{"id":"c"}],"nextPageToken":"page3"}"#)
                .page(Some("page3"), r#"{"items":[{"id":"d"}]}"#),
        );
        let (walker, ctx) = walker(&transport);

        let walk = walker.walk(&ctx).await.unwrap();
        assert_eq!(walk.identifiers, vec!["a", "b", "c", "d"]);
        assert_eq!(walk.pages, 3);
        assert_eq!(transport.requests(), 3);
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_dropped() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .page(None, r#"{"items":[{"id":"a"},{"id":"b"}],"nextPageToken":"p2"}"#)
                .page(Some("p2"), r#"{"items":[{"id":"b"},{"id":"c"}]}"#),
        );
        let (walker, ctx) = walker(&transport);

        let walk = walker.walk(&ctx).await.unwrap();
        assert_eq!(walk.identifiers, vec!["a", "b", "c"]);
        assert_eq!(walk.duplicates, 1);
    }

    #[tokio::test]
    async fn test_failure_mid_chain_aborts_walk() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .page(None, r#"{"items":[{"id":"a"}],"nextPageToken":"p2"}"#)
                .status(Some("p2"), 500),
        );
        let (walker, ctx) = walker(&transport);

        let err = walker.walk(&ctx).await.unwrap_err();
        assert!(matches!(err, FetchError::UpstreamStatus { code: 500, .. }));
    }

    #[tokio::test]
    async fn test_endless_tokens_hit_page_limit() {
        let transport = Arc::new(ScriptedTransport::new().fallback(
            r#"{"items":[{"id":"x"}],"nextPageToken":"again"}"#,
        ));
        let (walker, ctx) = walker(&transport);
        let walker = walker.with_max_pages(5);

        let err = walker.walk(&ctx).await.unwrap_err();
        assert!(matches!(err, FetchError::PaginationLimit { max_pages: 5 }));
        assert_eq!(transport.requests(), 5);
    }

    #[tokio::test]
    async fn test_exact_page_limit_succeeds() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .page(None, r#"{"items":[{"id":"a"}],"nextPageToken":"p2"}"#)
                .page(Some("p2"), r#"{"items":[{"id":"b"}]}"#),
        );
        let (walker, ctx) = walker(&transport);
        let walker = walker.with_max_pages(2);

        let walk = walker.walk(&ctx).await.unwrap();
        assert_eq!(walk.identifiers.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_walk_issues_no_requests() {
        let transport = Arc::new(ScriptedTransport::new().page(None, r#"{"items":[]}"#));
        let (walker, ctx) = walker(&transport);
        ctx.cancel_token().cancel();

        let err = walker.walk(&ctx).await.unwrap_err();
        assert!(matches!(err, FetchError::Cancelled));
        assert_eq!(transport.requests(), 0);
    }
}
