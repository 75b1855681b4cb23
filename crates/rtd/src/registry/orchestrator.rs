//! Enrichment orchestrator.
//!
//! For each request the orchestrator:
//! 1. Drops requested names that are not registered (with a warning)
//! 2. Selects requested providers that can fetch, in registration order
//! 3. Calls them concurrently, each bounded by
//!    `min(provider timeout or default timeout, deadline - now)`
//! 4. Merges the fragments in registration order
//! 5. Lets requested providers that can alter requests add to the result,
//!    within whatever time is left
//!
//! Provider failures, panics, and timeouts only ever show up as statuses.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::time::Instant;

use super::bounded::{call_bounded, CallOutcome};
use super::{Provider, ProviderRegistry, SkipReason};
use crate::errors::{ProviderError, RtdError};
use crate::fpd::{self, MergeOutcome};
use crate::models::{
    EnrichedResult, Fragment, Payload, ProviderName, ProviderOutcome, RequestContext,
};
use crate::provider::Capability;

/// Upper bound on the time `enrich` spends after the deadline.
///
/// Covers only merge bookkeeping; no provider call runs past the deadline.
pub const MERGE_GRACE: Duration = Duration::from_millis(5);

/// Orchestrator configuration.
#[derive(Clone, Debug, Default)]
pub struct OrchestratorSettings {
    /// Time limit for providers registered without their own timeout.
    /// `None` means such providers are bounded by the deadline only.
    pub default_timeout: Option<Duration>,
}

/// Runs enrichment against a frozen registry.
///
/// Cheap to clone; clones share the registry.
#[derive(Clone, Debug)]
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_settings(registry, OrchestratorSettings::default())
    }

    pub fn with_settings(registry: Arc<ProviderRegistry>, settings: OrchestratorSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Enrich `base` with the named providers, finishing by `deadline`.
    pub async fn enrich_payload<I, S>(
        &self,
        base: Payload,
        providers: I,
        deadline: Instant,
    ) -> Result<EnrichedResult, RtdError>
    where
        I: IntoIterator<Item = S>,
        S: Into<ProviderName>,
    {
        self.enrich(RequestContext::new(base, providers, deadline))
            .await
    }

    /// Enrich one request.
    ///
    /// # Errors
    ///
    /// [`RtdError::DeadlineElapsed`] when the deadline is not in the future.
    /// Nothing a provider does produces an error here.
    pub async fn enrich(&self, context: RequestContext) -> Result<EnrichedResult, RtdError> {
        if context.deadline <= Instant::now() {
            return Err(RtdError::DeadlineElapsed);
        }

        self.warn_unusable(&context);

        let fetchers = self.selected(&context, Capability::FetchData);
        let alterers = self.selected(&context, Capability::AlterBidRequest);

        if fetchers.is_empty() && alterers.is_empty() {
            debug!(
                "[{}] No providers selected, payload unchanged",
                context.log_label()
            );
            return Ok(EnrichedResult::unchanged(context.base));
        }

        let fragments = join_all(fetchers.iter().map(|provider| {
            self.run(
                provider,
                &context,
                "fetch_data",
                provider.handler().fetch_data(provider.params(), &context),
            )
        }))
        .await;

        let MergeOutcome {
            payload,
            mut conflicts,
        } = fpd::merge(&context.base, &fragments);
        let statuses = outcomes(fragments);

        let (payload, alterations) = if alterers.is_empty() {
            (payload, Vec::new())
        } else {
            let fragments = join_all(alterers.iter().map(|provider| {
                self.run(
                    provider,
                    &context,
                    "alter_bid_request",
                    provider
                        .handler()
                        .alter_bid_request(provider.params(), &payload, &context),
                )
            }))
            .await;

            let altered = fpd::merge(&payload, &fragments);
            conflicts.extend(altered.conflicts);
            (altered.payload, outcomes(fragments))
        };

        let result = EnrichedResult {
            payload,
            statuses,
            alterations,
            conflicts,
        };

        info!("[{}] Enrichment done: {}", context.log_label(), result.summary());
        Ok(result)
    }

    /// Requested providers with `capability`, in registration order.
    fn selected(&self, context: &RequestContext, capability: Capability) -> Vec<&Provider> {
        self.registry
            .list_by_capability(capability)
            .filter(|p| context.providers.contains(p.name()))
            .collect()
    }

    /// Log requested names that will never be called.
    fn warn_unusable(&self, context: &RequestContext) {
        for name in &context.providers {
            match self.registry.get(name) {
                Err(_) => warn!(
                    "[{}] Unknown provider '{}' requested, dropping",
                    context.log_label(),
                    name
                ),
                Ok(provider) => {
                    let caps = provider.capabilities();
                    if !caps.fetch_data && !caps.alter_bid_request {
                        warn!(
                            "[{}] Provider '{}' cannot fetch or alter, dropping",
                            context.log_label(),
                            name
                        );
                    }
                }
            }
        }
    }

    /// Time limit for one call to `provider`.
    fn bound_for(&self, provider: &Provider, context: &RequestContext) -> Duration {
        let remaining = context.remaining();
        match provider.timeout().or(self.settings.default_timeout) {
            Some(limit) => limit.min(remaining),
            None => remaining,
        }
    }

    /// Run one provider call and turn whatever happens into a fragment.
    async fn run<F>(
        &self,
        provider: &Provider,
        context: &RequestContext,
        operation: &'static str,
        call: F,
    ) -> Fragment
    where
        F: Future<Output = Result<Payload, ProviderError>>,
    {
        if let Some(reason) = SkipReason::for_state(provider.state()) {
            debug!(
                "[{}] Skipping '{}': {:?}",
                context.log_label(),
                provider.name(),
                reason
            );
            return Fragment::skipped(provider.name(), reason);
        }

        let bound = self.bound_for(provider, context);
        let started = Instant::now();

        match call_bounded(bound, call).await {
            CallOutcome::Done(data) => {
                debug!(
                    "[{}] {} '{}' returned {} keys in {:?}",
                    context.log_label(),
                    operation,
                    provider.name(),
                    data.len(),
                    started.elapsed()
                );
                Fragment::ok(provider.name(), data)
            }
            CallOutcome::Failed(message) => {
                warn!(
                    "[{}] {} '{}' failed: {}",
                    context.log_label(),
                    operation,
                    provider.name(),
                    message
                );
                Fragment::errored(provider.name(), message)
            }
            CallOutcome::TimedOut => {
                warn!(
                    "[{}] {} '{}' timed out after {:?}",
                    context.log_label(),
                    operation,
                    provider.name(),
                    bound
                );
                Fragment::timed_out(provider.name())
            }
        }
    }
}

fn outcomes(fragments: Vec<Fragment>) -> Vec<ProviderOutcome> {
    fragments
        .into_iter()
        .map(|f| ProviderOutcome {
            provider: f.provider,
            status: f.status,
        })
        .collect()
}
