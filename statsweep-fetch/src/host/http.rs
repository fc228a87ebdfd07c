//! HTTP transport with tracing and domain allowlist.
//!
//! This module provides the default [`Transport`] implementation:
//! - Request/response tracing
//! - Domain allowlist for security
//! - Per-request timeout enforced by the reqwest client

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;
use crate::transport::{ApiRequest, Method, RawResponse, Transport};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// User agent string for Statsweep.
const USER_AGENT: &str = concat!("Statsweep/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Transport
// ============================================================================

/// reqwest-backed transport with tracing and an optional domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
    timeout: Duration,
    allowed_domains: Option<Vec<String>>,
}

impl HttpTransport {
    /// Creates a new transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Fails if the underlying client cannot be built, which only happens
    /// when the system TLS configuration is broken.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new transport with a custom timeout.
    ///
    /// # Errors
    ///
    /// Fails if the underlying client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                FetchError::Transport(format!(
                    "Failed to create HTTP client: {e}. \
                    This usually indicates a broken TLS/SSL configuration."
                ))
            })?;

        Ok(Self {
            inner: client,
            timeout,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains (and their subdomains).
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Returns the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), FetchError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let parsed = Url::parse(url)?;

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidRequest("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Maps a reqwest error without letting its embedded URL through.
    fn request_error(&self, err: reqwest::Error, display_url: &str) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout {
                url: display_url.to_string(),
                timeout: self.timeout,
            };
        }
        match FetchError::from(err.without_url()) {
            FetchError::Transport(msg) => FetchError::Transport(format!("{msg} ({display_url})")),
            other => other,
        }
    }

    fn build_headers(headers: &[(String, String)]) -> Result<HeaderMap, FetchError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::InvalidRequest(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::InvalidRequest(format!("header value for '{name}': {e}")))?;
            map.append(name, value);
        }
        Ok(map)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.display_url()))]
    async fn request(&self, request: ApiRequest) -> Result<RawResponse, FetchError> {
        self.is_domain_allowed(&request.url)?;
        let display_url = request.display_url();
        let headers = Self::build_headers(&request.headers)?;

        let mut builder = match request.method {
            Method::Get => self.inner.get(&request.url),
            Method::Post => self.inner.post(&request.url),
        };
        builder = builder.headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        debug!("Sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| self.request_error(e, &display_url))?;

        let status = response.status().as_u16();
        debug!(status, "Response received");

        let body = response
            .bytes()
            .await
            .map_err(|e| self.request_error(e, &display_url))?;

        Ok(RawResponse {
            status,
            url: request.url,
            body: body.to_vec(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let transport = HttpTransport::new()
            .unwrap()
            .with_allowed_domains(vec!["googleapis.com".to_string()]);

        assert!(transport
            .is_domain_allowed("https://www.googleapis.com/youtube/v3/videos")
            .is_ok());
        assert!(transport.is_domain_allowed("https://googleapis.com/x").is_ok());
        assert!(transport.is_domain_allowed("https://evil.com/steal").is_err());
    }

    #[test]
    fn test_no_domain_restrictions() {
        let transport = HttpTransport::new().unwrap();
        assert!(transport.is_domain_allowed("https://any.domain.com").is_ok());
    }

    #[test]
    fn test_invalid_url_with_allowlist() {
        let transport = HttpTransport::new()
            .unwrap()
            .with_allowed_domains(vec!["example.com".to_string()]);
        assert!(matches!(
            transport.is_domain_allowed("not-a-valid-url"),
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_bad_header_rejected() {
        let headers = vec![("bad header".to_string(), "v".to_string())];
        assert!(HttpTransport::build_headers(&headers).is_err());
    }
}
