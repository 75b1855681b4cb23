//! HTTP provider for remote real-time data.
//!
//! GETs `params.url` and returns the JSON object in the response body.
//! Optional params:
//! - `path` - dotted path to a nested object in the response (e.g., "data.ortb2")
//! - `headers` - object of extra request headers
//!
//! The call is cancelled by the orchestrator when it runs out of time; the
//! client-level timeout only bounds calls made outside an enrichment.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::models::{Payload, RequestContext};
use crate::provider::{params, Capabilities, RtdProvider};

/// Provider ID constant
const PROVIDER_ID: &str = "http";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP data provider.
///
/// # Example
///
/// ```ignore
/// use bidflow_rtd::provider::HttpProvider;
///
/// let provider = HttpProvider::new();
/// ```
pub struct HttpProvider {
    client: Client,
}

impl HttpProvider {
    /// Create a provider with its own client.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Create a provider sharing an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Walk a dotted path down to a nested object.
    fn select<'a>(body: &'a Value, path: Option<&str>) -> Result<&'a Payload, ProviderError> {
        let mut current = body;
        for segment in path.into_iter().flat_map(|p| p.split('.')).filter(|s| !s.is_empty()) {
            current = current.get(segment).ok_or_else(|| ProviderError::InvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("missing '{}' in response", segment),
            })?;
        }

        current.as_object().ok_or_else(|| ProviderError::InvalidResponse {
            provider: PROVIDER_ID.to_string(),
            message: "response is not a JSON object".to_string(),
        })
    }
}

impl Default for HttpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RtdProvider for HttpProvider {
    fn capabilities(&self) -> Capabilities {
        Capabilities::fetch_only()
    }

    async fn fetch_data(
        &self,
        params: &Payload,
        context: &RequestContext,
    ) -> Result<Payload, ProviderError> {
        let url = params::string(PROVIDER_ID, params, "url")?;
        let path = params::opt_string(PROVIDER_ID, params, "path")?;

        let mut request = self.client.get(url);
        if let Some(headers) = params.get("headers") {
            let headers = headers.as_object().ok_or_else(|| {
                ProviderError::invalid_params(PROVIDER_ID, "'headers' must be an object")
            })?;
            for (name, value) in headers {
                let value = value.as_str().ok_or_else(|| {
                    ProviderError::invalid_params(
                        PROVIDER_ID,
                        format!("header '{}' must be a string", name),
                    )
                })?;
                request = request.header(name.as_str(), value);
            }
        }

        debug!("[{}] GET {}", context.log_label(), url);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::fetch(
                PROVIDER_ID,
                format!("{} returned {}", url, status),
            ));
        }

        let body: Value = response.json().await?;
        Self::select(&body, path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::time::Instant;

    /// Serve a single canned response and return the URL to hit.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/rtd", addr)
    }

    fn context() -> RequestContext {
        RequestContext::new(
            Payload::new(),
            ["remote"],
            Instant::now() + Duration::from_secs(5),
        )
    }

    fn params(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_select_nested_object() {
        let body = json!({ "data": { "ortb2": { "user": { "yob": 1990 } } } });
        let selected = HttpProvider::select(&body, Some("data.ortb2")).unwrap();
        assert_eq!(selected.get("user"), Some(&json!({ "yob": 1990 })));

        let whole = HttpProvider::select(&body, None).unwrap();
        assert!(whole.contains_key("data"));
    }

    #[test]
    fn test_select_rejects_non_object() {
        let body = json!({ "data": [1, 2, 3] });
        assert!(matches!(
            HttpProvider::select(&body, Some("data")),
            Err(ProviderError::InvalidResponse { .. })
        ));
        assert!(HttpProvider::select(&body, Some("missing")).is_err());
    }

    #[tokio::test]
    async fn test_fetches_json_object() {
        let url = serve_once("200 OK", r#"{"geo":{"country":"US"}}"#).await;
        let provider = HttpProvider::new();

        let data = provider
            .fetch_data(&params(json!({ "url": url })), &context())
            .await
            .unwrap();

        assert_eq!(data.get("geo"), Some(&json!({ "country": "US" })));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let url = serve_once("503 Service Unavailable", "{}").await;
        let provider = HttpProvider::new();

        let result = provider
            .fetch_data(&params(json!({ "url": url })), &context())
            .await;

        assert!(matches!(result, Err(ProviderError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_missing_url_is_invalid_params() {
        let provider = HttpProvider::new();
        let result = provider.fetch_data(&Payload::new(), &context()).await;
        assert!(matches!(result, Err(ProviderError::InvalidParams { .. })));
    }

    #[tokio::test]
    async fn test_bad_headers_are_invalid_params() {
        let provider = HttpProvider::new();
        let p = params(json!({ "url": "http://127.0.0.1:9/", "headers": { "x-key": 1 } }));
        let result = provider.fetch_data(&p, &context()).await;
        assert!(matches!(result, Err(ProviderError::InvalidParams { .. })));
    }
}
