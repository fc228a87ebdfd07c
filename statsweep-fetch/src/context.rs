//! Fetch context shared by the page and detail fetchers.
//!
//! The context bundles the injected transport with the per-request timeout
//! and the cancellation token of the running gather cycle. Every network
//! call goes through [`FetchContext::execute`], which is where both are
//! enforced.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::body::parse_json;
use crate::error::FetchError;
use crate::host::http::HttpTransport;
use crate::transport::{ApiRequest, RawResponse, Transport};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Fetch Context
// ============================================================================

/// Transport handle plus timeout and cancellation for one gather cycle.
#[derive(Clone)]
pub struct FetchContext {
    /// The transport used for every request.
    pub transport: Arc<dyn Transport>,
    timeout: Duration,
    cancel: CancellationToken,
}

impl FetchContext {
    /// Creates a context around an existing transport with default settings.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the cancellation token observed by this context.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns true once the cycle has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Sends one request, honoring the timeout and the cancellation token.
    ///
    /// # Errors
    ///
    /// - `FetchError::Cancelled` if the token is (or becomes) cancelled
    /// - `FetchError::Timeout` if the transport does not answer in time
    /// - any error returned by the transport
    pub async fn execute(&self, request: ApiRequest) -> Result<RawResponse, FetchError> {
        if self.cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let url = request.display_url();
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(FetchError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.transport.request(request)) => {
                result.unwrap_or_else(|_| Err(FetchError::Timeout { url, timeout: self.timeout }))
            }
        }
    }

    /// Sends one request and parses a 200 response body as JSON.
    ///
    /// Error URLs have secret parameter values redacted.
    ///
    /// # Errors
    ///
    /// - `FetchError::UpstreamStatus` for any status other than 200
    /// - `FetchError::MalformedResponse` for empty or invalid bodies
    /// - everything [`execute`](Self::execute) can return
    pub async fn fetch_json(&self, request: ApiRequest) -> Result<Value, FetchError> {
        let url = request.display_url();
        let response = self.execute(request).await?;
        if !response.is_ok() {
            return Err(FetchError::UpstreamStatus {
                code: response.status,
                url,
            });
        }
        debug!(bytes = response.body.len(), "Parsing response body");
        parse_json(&response.body)
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("timeout", &self.timeout)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Default)]
pub struct FetchContextBuilder {
    transport: Option<Arc<dyn Transport>>,
    timeout: Option<Duration>,
    allowed_domains: Option<Vec<String>>,
    cancel: Option<CancellationToken>,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transport. Defaults to an [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Restricts the default transport to the given domains.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Sets the cancellation token.
    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Builds the fetch context.
    ///
    /// # Errors
    ///
    /// Fails only if the default HTTP transport cannot be created.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut http = HttpTransport::with_timeout(timeout)?;
                if let Some(domains) = self.allowed_domains {
                    http = http.with_allowed_domains(domains);
                }
                Arc::new(http)
            }
        };

        Ok(FetchContext {
            transport,
            timeout,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
