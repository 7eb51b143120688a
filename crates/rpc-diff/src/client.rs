//! Fetching responses from JSON-RPC servers

use crate::error::{DiffError, DiffResult};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One server's answer, kept both parsed and as received
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// Parsed body, always a JSON object
    pub value: Value,
    /// Body bytes exactly as the server sent them
    pub raw: Vec<u8>,
}

/// Performs a single request/response exchange with one server
#[async_trait]
pub trait ResponseFetcher: Send + Sync {
    /// Send `request` to `endpoint` and return its decoded response.
    ///
    /// Exactly one round trip, no retries.
    async fn fetch(&self, endpoint: &str, request: &Value) -> DiffResult<FetchedResponse>;
}

#[async_trait]
impl<T: ResponseFetcher + ?Sized> ResponseFetcher for Arc<T> {
    async fn fetch(&self, endpoint: &str, request: &Value) -> DiffResult<FetchedResponse> {
        (**self).fetch(endpoint, request).await
    }
}

/// Fetcher that POSTs the request as `application/json`
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher, optionally bounding each request by `timeout`
    pub fn new(timeout: Option<Duration>) -> DiffResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DiffError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ResponseFetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &str, request: &Value) -> DiffResult<FetchedResponse> {
        let body = serde_json::to_vec(request).map_err(|source| DiffError::Encoding { source })?;

        let response = self
            .client
            .post(endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| DiffError::Transport {
                server: endpoint.to_string(),
                source,
            })?;

        // The status code is not compared: error replies are JSON-RPC objects too.
        debug!("{} answered with status {}", endpoint, response.status());

        let raw = response
            .bytes()
            .await
            .map_err(|source| DiffError::Transport {
                server: endpoint.to_string(),
                source,
            })?
            .to_vec();

        let value = decode_object(endpoint, &raw)?;
        Ok(FetchedResponse { value, raw })
    }
}

/// Parse a response body, requiring a JSON object at the top level
pub fn decode_object(server: &str, raw: &[u8]) -> DiffResult<Value> {
    let value: Value = serde_json::from_slice(raw).map_err(|e| DiffError::Decoding {
        server: server.to_string(),
        reason: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(DiffError::Decoding {
            server: server.to_string(),
            reason: format!("expected a JSON object, got {}", kind_of(&value)),
        });
    }

    Ok(value)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
