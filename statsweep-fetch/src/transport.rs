//! Transport trait and request/response types.
//!
//! The transport is the single seam between the collector and the network.
//! It is handed to the fetchers explicitly (through [`FetchContext`]) so tests
//! can substitute a scripted implementation.
//!
//! [`FetchContext`]: crate::context::FetchContext

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FetchError;

/// Placeholder shown instead of secret parameter values.
const REDACTED: &str = "REDACTED";

// ============================================================================
// Method
// ============================================================================

/// HTTP method used for listing and detail requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Parameters go into the query string.
    #[default]
    Get,
    /// Parameters go into a urlencoded form body.
    Post,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request / Response
// ============================================================================

/// A fully built request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Optional request body.
    pub body: Option<String>,
    /// Query parameters whose values must not appear in errors or logs.
    pub secret_params: Vec<String>,
}

impl ApiRequest {
    /// Creates a GET request with no headers or body.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            secret_params: Vec::new(),
        }
    }

    /// Returns the URL with every secret parameter value replaced.
    ///
    /// This is the form used in errors and tracing fields. A URL that does
    /// not parse is cut at its query string.
    pub fn display_url(&self) -> String {
        if self.secret_params.is_empty() {
            return self.url.clone();
        }
        let Ok(mut url) = url::Url::parse(&self.url) else {
            return self.url.split('?').next().unwrap_or_default().to_string();
        };

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let value = if self.secret_params.iter().any(|s| *s == k) {
                    REDACTED.to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(&pairs);
        url.into()
    }

    /// Looks up a query parameter on the request URL.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let url = url::Url::parse(&self.url).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// URL the request was sent to.
    pub url: String,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns true for HTTP 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Issues a single HTTP request.
///
/// Implementations never retry; retry policy belongs to the caller.
/// A non-200 status is not an error at this level, it is returned in
/// [`RawResponse::status`] and interpreted by the fetchers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw response.
    async fn request(&self, request: ApiRequest) -> Result<RawResponse, FetchError>;
}
