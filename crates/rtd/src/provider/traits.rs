//! RTD provider trait definitions.
//!
//! This module defines the core `RtdProvider` trait that all real-time data
//! providers, and the test doubles standing in for them, must implement.

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{Consent, Payload, RequestContext};

use super::capabilities::Capabilities;

/// Trait for real-time data providers.
///
/// Implement this trait to add a new data source. The provider's name,
/// params, and timeout live on its registry entry; the same implementation
/// can be registered several times under different names.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use bidflow_rtd::provider::{Capabilities, RtdProvider};
///
/// struct GeoProvider;
///
/// #[async_trait]
/// impl RtdProvider for GeoProvider {
///     fn capabilities(&self) -> Capabilities {
///         Capabilities::fetch_only()
///     }
///
///     async fn fetch_data(
///         &self,
///         _params: &Payload,
///         _context: &RequestContext,
///     ) -> Result<Payload, ProviderError> {
///         let mut data = Payload::new();
///         data.insert("country".into(), "US".into());
///         Ok(data)
///     }
/// }
/// ```
#[async_trait]
pub trait RtdProvider: Send + Sync {
    /// Describes what this provider can do.
    ///
    /// Read once at registration.
    fn capabilities(&self) -> Capabilities;

    /// One-time setup.
    ///
    /// Only called when [`Capabilities::init`] is set. Returning `Ok(false)`
    /// declines: the provider stays registered but is never called.
    async fn init(
        &self,
        params: &Payload,
        consent: Option<&Consent>,
    ) -> Result<bool, ProviderError> {
        let _ = (params, consent);
        Ok(true)
    }

    /// Fetch enrichment data for a request.
    ///
    /// # Arguments
    ///
    /// * `params` - The params this provider was registered with
    /// * `context` - The request being enriched
    ///
    /// # Returns
    ///
    /// A JSON object to merge into the request. May be cancelled at any
    /// await point when the call runs out of time.
    async fn fetch_data(
        &self,
        params: &Payload,
        context: &RequestContext,
    ) -> Result<Payload, ProviderError>;

    /// Add to the merged request.
    ///
    /// Receives the payload after every fetch was merged. The returned object
    /// is merged add-only: it can never replace a leaf that already exists.
    /// Default implementation returns `NotSupported`.
    async fn alter_bid_request(
        &self,
        params: &Payload,
        request: &Payload,
        context: &RequestContext,
    ) -> Result<Payload, ProviderError> {
        let _ = (params, request, context);
        Err(ProviderError::NotSupported {
            operation: "alter_bid_request".to_string(),
            provider: std::any::type_name::<Self>().to_string(),
        })
    }
}
