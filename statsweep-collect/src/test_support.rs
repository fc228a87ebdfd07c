//! Scripted transport for unit tests.
//!
//! Listing requests are routed by their `pageToken` parameter and detail
//! requests by their `id` parameter. A detail can also be scripted to fail
//! with a transport error.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use statsweep_fetch::{ApiRequest, FetchError, RawResponse, Transport};

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    pages: HashMap<Option<String>, (u16, String)>,
    details: HashMap<String, (u16, String)>,
    detail_errors: HashMap<String, String>,
    fallback: Option<String>,
    requests: AtomicUsize,
    detail_log: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, token: Option<&str>, body: &str) -> Self {
        self.pages
            .insert(token.map(str::to_string), (200, body.to_string()));
        self
    }

    pub(crate) fn status(mut self, token: Option<&str>, status: u16) -> Self {
        self.pages
            .insert(token.map(str::to_string), (status, String::new()));
        self
    }

    pub(crate) fn fallback(mut self, body: &str) -> Self {
        self.fallback = Some(body.to_string());
        self
    }

    pub(crate) fn detail(mut self, id: &str, body: &str) -> Self {
        self.details
            .insert(id.to_string(), (200, body.to_string()));
        self
    }

    pub(crate) fn detail_status(mut self, id: &str, status: u16) -> Self {
        self.details.insert(id.to_string(), (status, String::new()));
        self
    }

    pub(crate) fn detail_error(mut self, id: &str, message: &str) -> Self {
        self.detail_errors.insert(id.to_string(), message.to_string());
        self
    }

    pub(crate) fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub(crate) fn detail_requests(&self) -> Vec<String> {
        self.detail_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, request: ApiRequest) -> Result<RawResponse, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let scripted = if let Some(id) = request.query_param("id") {
            self.detail_log.lock().unwrap().push(id.clone());
            if let Some(message) = self.detail_errors.get(&id) {
                return Err(FetchError::Transport(message.clone()));
            }
            self.details.get(&id).cloned()
        } else {
            self.pages
                .get(&request.query_param("pageToken"))
                .cloned()
                .or_else(|| self.fallback.clone().map(|body| (200, body)))
        };

        let (status, body) = scripted.unwrap_or((404, String::new()));
        Ok(RawResponse {
            status,
            url: request.url,
            body: body.into_bytes(),
        })
    }
}
