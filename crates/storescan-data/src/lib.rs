//! HTTP client utilities for storescan.
//!
//! [`FetchClient`] is a thin builder over `reqwest` with a base URL and
//! default headers. [`HttpStoreApi`] uses it to implement the store
//! backend the commerce core consumes.
//!
//! # Example
//!
//! ```rust,ignore
//! use storescan_data::FetchClient;
//!
//! let client = FetchClient::new().with_base_url("https://api.example.com");
//! let response = client.get("/stores/8901030").send().await?;
//! let payload: serde_json::Value = response.error_for_status()?.json()?;
//! ```
//!
//! Requests carry no timeout and are never retried here.

mod error;
mod request;
mod response;
mod store_api;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use store_api::{
    decode_catalog, decode_order, encode_order, HttpStoreApi, WireOrder, WireOrderLine,
    DEFAULT_MOBILE,
};

use std::collections::{BTreeMap, HashMap};

/// HTTP client for the store backend.
#[derive(Debug, Clone, Default)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: BTreeMap<String, String>,
}

impl FetchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with a base URL that will be prepended to relative
    /// request paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }

    /// Send a prepared request and read the whole response.
    ///
    /// Non-2xx statuses are returned as a [`Response`], not an error.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let RequestBuilder {
            method,
            url,
            headers,
            body,
        } = request;
        tracing::debug!(%method, %url, "sending request");

        let mut outgoing = self.http.request(method.to_reqwest(), &url);
        for (key, value) in &headers {
            outgoing = outgoing.header(key.as_str(), value.as_str());
        }
        if let Some(body) = body {
            outgoing = outgoing.body(body);
        }

        let response = outgoing.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(%method, %url, status, bytes = body.len(), "response received");

        Ok(Response::new(status, headers, body))
    }
}

/// A request builder bound to a client.
#[derive(Debug)]
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl ClientRequestBuilder<'_> {
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// The request as it will be sent.
    pub fn prepared(&self) -> &RequestBuilder {
        &self.builder
    }

    pub async fn send(self) -> Result<Response, FetchError> {
        self.client.execute(self.builder).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpStoreApi, Method, Response};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_join_base_url() {
        let client = FetchClient::new().with_base_url("http://localhost:5000/api/");
        assert_eq!(
            client.get("/stores/8901").prepared().url(),
            "http://localhost:5000/api/stores/8901"
        );
        assert_eq!(
            client.post("orders").prepared().url(),
            "http://localhost:5000/api/orders"
        );
    }

    #[test]
    fn test_absolute_urls_bypass_base_url() {
        let client = FetchClient::new().with_base_url("http://localhost:5000");
        assert_eq!(
            client.get("https://other.example/x").prepared().url(),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_default_headers_apply_to_every_request() {
        let client = FetchClient::new().with_default_header("Accept", "application/json");
        let req = client.get("http://localhost/a").header("X-Trace", "1");
        assert_eq!(req.prepared().header_value("Accept"), Some("application/json"));
        assert_eq!(req.prepared().header_value("X-Trace"), Some("1"));
        assert_eq!(req.prepared().method(), Method::Get);
    }
}
