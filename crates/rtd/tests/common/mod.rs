//! Test doubles implementing the same provider trait as real providers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bidflow_rtd::{Capabilities, Payload, ProviderError, RequestContext, RtdProvider};
use serde_json::Value;

pub fn obj(value: Value) -> Payload {
    value
        .as_object()
        .cloned()
        .expect("test payloads are objects")
}

/// Returns fixed data after a delay.
pub struct FixedProvider {
    data: Payload,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl FixedProvider {
    pub fn new(data: Payload, delay: Duration) -> Self {
        Self {
            data,
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn after_ms(data: Value, delay_ms: u64) -> Self {
        Self::new(obj(data), Duration::from_millis(delay_ms))
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl RtdProvider for FixedProvider {
    fn capabilities(&self) -> Capabilities {
        Capabilities::fetch_only()
    }

    async fn fetch_data(
        &self,
        _params: &Payload,
        _context: &RequestContext,
    ) -> Result<Payload, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.data.clone())
    }
}

/// Never answers.
pub struct HangingProvider;

#[async_trait]
impl RtdProvider for HangingProvider {
    fn capabilities(&self) -> Capabilities {
        Capabilities::fetch_only()
    }

    async fn fetch_data(
        &self,
        _params: &Payload,
        _context: &RequestContext,
    ) -> Result<Payload, ProviderError> {
        std::future::pending().await
    }
}

/// Always fails.
pub struct FailingProvider;

#[async_trait]
impl RtdProvider for FailingProvider {
    fn capabilities(&self) -> Capabilities {
        Capabilities::fetch_only()
    }

    async fn fetch_data(
        &self,
        _params: &Payload,
        _context: &RequestContext,
    ) -> Result<Payload, ProviderError> {
        Err(ProviderError::fetch("failing", "upstream unavailable"))
    }
}

/// Panics mid-call.
pub struct PanickingProvider;

#[async_trait]
impl RtdProvider for PanickingProvider {
    fn capabilities(&self) -> Capabilities {
        Capabilities::fetch_only()
    }

    async fn fetch_data(
        &self,
        _params: &Payload,
        _context: &RequestContext,
    ) -> Result<Payload, ProviderError> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        panic!("provider bug");
    }
}
