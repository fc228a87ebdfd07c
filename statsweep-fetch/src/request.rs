//! Request building from static endpoint parameters.

use std::collections::{BTreeMap, BTreeSet};
use url::Url;

use crate::error::FetchError;
use crate::transport::{ApiRequest, Method};

/// Content type sent with POST bodies.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Method, extra parameters, and headers shared by every request of a collector.
///
/// For `GET`, all parameters are appended to the query string. For `POST`,
/// the endpoint's own query string is kept and all parameters are sent as
/// a urlencoded form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTemplate {
    /// HTTP method.
    pub method: Method,
    /// Parameters added to every request.
    pub parameters: BTreeMap<String, String>,
    /// Headers added to every request.
    pub headers: BTreeMap<String, String>,
    /// Names of parameters whose values are kept out of errors and logs.
    pub secret_parameters: BTreeSet<String>,
}

impl RequestTemplate {
    /// Creates a template for the given method.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// Adds a parameter sent with every request.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Adds a parameter whose value is redacted wherever the request URL is
    /// reported.
    pub fn with_secret_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.secret_parameters.insert(name.clone());
        self.parameters.insert(name, value.into());
        self
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Builds a request against `endpoint` with the call-specific `params`
    /// followed by the template parameters.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidRequest` if `endpoint` is not a valid URL.
    pub fn build(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<ApiRequest, FetchError> {
        let mut url = Url::parse(endpoint)?;
        let all_params: Vec<(&str, &str)> = params
            .iter()
            .copied()
            .chain(self.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect();

        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let body = match self.method {
            Method::Get => {
                if !all_params.is_empty() {
                    url.query_pairs_mut().extend_pairs(&all_params);
                }
                None
            }
            Method::Post => {
                let body = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&all_params)
                    .finish();
                if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
                    headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                }
                Some(body)
            }
        };

        Ok(ApiRequest {
            method: self.method,
            url: url.into(),
            headers,
            body,
            secret_params: self.secret_parameters.iter().cloned().collect(),
        })
    }
}
