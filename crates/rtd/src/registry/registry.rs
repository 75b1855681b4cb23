//! Provider registry.
//!
//! The registry is filled at startup, optionally initialized, then frozen
//! behind an `Arc` and shared read-only with the orchestrator. There is no
//! way to mutate it through a shared reference, so concurrent enrichment
//! calls never contend on it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};

use super::bounded::{call_bounded, CallOutcome};
use crate::errors::RtdError;
use crate::models::{Consent, Payload, ProviderName};
use crate::provider::{Capabilities, Capability, RtdProvider};

/// Lifecycle of a registered provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderState {
    /// Usable.
    Ready,
    /// Declares `init` and has not been initialized yet.
    AwaitingInit,
    /// `init` declined, failed, or timed out. Never called again.
    Declined,
}

/// A registry entry: a provider implementation plus how to run it.
pub struct Provider {
    name: ProviderName,
    handler: Arc<dyn RtdProvider>,
    capabilities: Capabilities,
    params: Payload,
    timeout: Option<Duration>,
    state: ProviderState,
}

impl Provider {
    /// Wrap an implementation under a name.
    ///
    /// Capabilities are read from the implementation once, here.
    pub fn new(name: impl Into<ProviderName>, handler: impl RtdProvider + 'static) -> Self {
        Self::shared(name, Arc::new(handler))
    }

    /// Like [`Provider::new`], for an implementation shared between entries.
    pub fn shared(name: impl Into<ProviderName>, handler: Arc<dyn RtdProvider>) -> Self {
        let capabilities = handler.capabilities();
        let state = if capabilities.init {
            ProviderState::AwaitingInit
        } else {
            ProviderState::Ready
        };

        Self {
            name: name.into(),
            handler,
            capabilities,
            params: Payload::new(),
            timeout: None,
            state,
        }
    }

    /// Params passed to every call
    pub fn with_params(mut self, params: Payload) -> Self {
        self.params = params;
        self
    }

    /// Per-call time limit, overriding the orchestrator default
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn params(&self) -> &Payload {
        &self.params
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn state(&self) -> ProviderState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ProviderState::Ready
    }

    pub(crate) fn handler(&self) -> &dyn RtdProvider {
        self.handler.as_ref()
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("timeout", &self.timeout)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Registry of RTD providers, in registration order.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
    /// Name -> position in `providers`.
    index: HashMap<ProviderName, usize>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider.
    ///
    /// # Errors
    ///
    /// [`RtdError::DuplicateProvider`] when the name is taken. The registry
    /// is left exactly as it was.
    pub fn register(&mut self, provider: Provider) -> Result<(), RtdError> {
        if self.index.contains_key(provider.name()) {
            return Err(RtdError::DuplicateProvider(provider.name().to_string()));
        }

        debug!(
            "Registered provider '{}' ({:?})",
            provider.name(),
            provider.capabilities()
        );
        self.index
            .insert(provider.name().to_string(), self.providers.len());
        self.providers.push(provider);
        Ok(())
    }

    /// Look up a provider by name.
    ///
    /// # Errors
    ///
    /// [`RtdError::UnknownProvider`] when nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<&Provider, RtdError> {
        self.index
            .get(name)
            .map(|&i| &self.providers[i])
            .ok_or_else(|| RtdError::UnknownProvider(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Providers declaring `capability`, in registration order.
    ///
    /// The iterator is lazy and `Clone`, so it can be restarted.
    pub fn list_by_capability(
        &self,
        capability: Capability,
    ) -> impl Iterator<Item = &Provider> + Clone + '_ {
        self.providers
            .iter()
            .filter(move |p| p.capabilities.supports(capability))
    }

    /// All providers, in registration order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.providers.iter().map(|p| p.name())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Run `init` on every provider still awaiting it.
    ///
    /// Calls run concurrently, each bounded by `timeout`. A provider that
    /// returns `Ok(true)` becomes ready; one that declines, errors, panics,
    /// or times out is marked declined and will be skipped by enrichment.
    ///
    /// Returns the names of providers that were declined by this call.
    pub async fn initialize(
        &mut self,
        consent: Option<&Consent>,
        timeout: Duration,
    ) -> Vec<ProviderName> {
        let results = {
            let pending = self
                .providers
                .iter()
                .enumerate()
                .filter(|(_, p)| p.state == ProviderState::AwaitingInit);

            join_all(pending.map(|(i, p)| async move {
                let outcome = call_bounded(timeout, p.handler().init(p.params(), consent)).await;
                (i, outcome)
            }))
            .await
        };

        let mut declined = Vec::new();
        for (i, outcome) in results {
            let provider = &mut self.providers[i];
            provider.state = match outcome {
                CallOutcome::Done(true) => {
                    debug!("Provider '{}' initialized", provider.name);
                    ProviderState::Ready
                }
                CallOutcome::Done(false) => {
                    info!("Provider '{}' declined to initialize", provider.name);
                    ProviderState::Declined
                }
                CallOutcome::Failed(message) => {
                    warn!("Provider '{}' failed to initialize: {}", provider.name, message);
                    ProviderState::Declined
                }
                CallOutcome::TimedOut => {
                    warn!(
                        "Provider '{}' did not initialize within {:?}",
                        provider.name, timeout
                    );
                    ProviderState::Declined
                }
            };
            if provider.state == ProviderState::Declined {
                declined.push(provider.name.clone());
            }
        }

        declined
    }
}
