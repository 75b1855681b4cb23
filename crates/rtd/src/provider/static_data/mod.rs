//! Static provider for configured first-party data.
//!
//! Returns the object found under `params.data` on every request. Useful for
//! publisher-supplied data that does not change per request, and as a
//! predictable stand-in for a remote provider (`params.delayMs` adds latency).
//!
//! ```json
//! { "name": "site", "source": "static", "params": { "data": { "site": { "cat": ["IAB1"] } } } }
//! ```

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{Consent, Payload, RequestContext};
use crate::provider::{params, Capabilities, RtdProvider};

/// Provider ID constant
const PROVIDER_ID: &str = "static";

/// Static data provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticProvider;

impl StaticProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RtdProvider for StaticProvider {
    fn capabilities(&self) -> Capabilities {
        Capabilities::fetch_only().with_init()
    }

    /// Rejects params without a `data` object or with a malformed `delayMs`.
    async fn init(
        &self,
        params: &Payload,
        _consent: Option<&Consent>,
    ) -> Result<bool, ProviderError> {
        params::object(PROVIDER_ID, params, "data")?;
        params::opt_millis(PROVIDER_ID, params, "delayMs")?;
        Ok(true)
    }

    async fn fetch_data(
        &self,
        params: &Payload,
        _context: &RequestContext,
    ) -> Result<Payload, ProviderError> {
        let data = params::object(PROVIDER_ID, params, "data")?.clone();

        if let Some(delay) = params::opt_millis(PROVIDER_ID, params, "delayMs")? {
            tokio::time::sleep(delay).await;
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    fn context() -> RequestContext {
        RequestContext::new(
            Payload::new(),
            ["site"],
            Instant::now() + Duration::from_millis(500),
        )
    }

    fn params(value: serde_json::Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_capabilities() {
        let caps = StaticProvider::new().capabilities();
        assert!(caps.init);
        assert!(caps.fetch_data);
        assert!(!caps.alter_bid_request);
    }

    #[tokio::test]
    async fn test_returns_configured_data() {
        let provider = StaticProvider::new();
        let p = params(json!({ "data": { "site": { "cat": ["IAB1"] } } }));

        let data = provider.fetch_data(&p, &context()).await.unwrap();
        assert_eq!(data.get("site"), Some(&json!({ "cat": ["IAB1"] })));
    }

    #[tokio::test]
    async fn test_init_rejects_missing_data() {
        let provider = StaticProvider::new();
        let result = provider.init(&Payload::new(), None).await;
        assert!(matches!(result, Err(ProviderError::InvalidParams { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_applied() {
        let provider = StaticProvider::new();
        let p = params(json!({ "data": {}, "delayMs": 40 }));

        let start = Instant::now();
        provider.fetch_data(&p, &context()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_alter_bid_request_not_supported() {
        let provider = StaticProvider::new();
        let result = provider
            .alter_bid_request(&Payload::new(), &Payload::new(), &context())
            .await;
        assert!(matches!(result, Err(ProviderError::NotSupported { .. })));
    }
}
