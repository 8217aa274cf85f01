use super::error::HttpError;
use crate::APP_USER_AGENT;
use reqwest::{
    Client, Method,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default request timeout applied to every call.
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const JSON_CONTENT_TYPE: &str = "application/json";

/// Per-call options. Caller headers are applied after the JSON default, so a
/// caller-supplied `Content-Type` wins.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    method: Method,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::with_method(Method::GET)
    }

    #[must_use]
    pub fn post() -> Self {
        Self::with_method(Method::POST)
    }

    #[must_use]
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Serialize `body` as the JSON request payload.
    ///
    /// # Errors
    /// Returns `HttpError::Encode` if the body cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, HttpError> {
        self.body = Some(serde_json::to_vec(body).map_err(HttpError::Encode)?);
        Ok(self)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    fn merged_headers(&self) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HttpError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeader(name.as_str().to_string()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

/// JSON client bound to one base URL.
///
/// Issues exactly one network call per [`HttpClient::request`]; retry and
/// caching policy belong to callers.
#[derive(Clone, Debug)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Build a client with the default timeout and user agent.
    ///
    /// # Errors
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        build_url_with_base(&self.base_url, endpoint)
    }

    /// Send one request and decode the JSON response into `T`.
    ///
    /// An empty success body decodes as JSON `null`, so `T = ()` covers `204`.
    ///
    /// # Errors
    /// - `HttpError::Status` for non-success responses, carrying the status,
    ///   the server `message` (or `"HTTP Error {status}"`) and the parsed body.
    /// - `HttpError::Transport` when the request cannot be completed.
    /// - `HttpError::Decode` when a success body does not match `T`.
    #[instrument(skip(self, options), fields(http.method = %options.method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, HttpError> {
        let url = self.url(endpoint);
        let headers = options.merged_headers()?;

        let mut builder = self
            .client
            .request(options.method.clone(), &url)
            .headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(url = %url, status = status.as_u16(), "upstream response");

        if !status.is_success() {
            return Err(HttpError::from_response(status.as_u16(), &bytes));
        }

        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(payload).map_err(HttpError::Decode)
    }
}

/// Joins a base URL and an endpoint with exactly one `/` between them.
fn build_url_with_base(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let endpoint = endpoint.trim();

    if base.is_empty() {
        endpoint.to_string()
    } else {
        format!("{}/{}", base, endpoint.trim_start_matches('/'))
    }
}
