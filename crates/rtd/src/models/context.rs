use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::types::{Payload, ProviderName};

/// Privacy signals forwarded to providers.
///
/// The crate does not interpret these. Providers decide what they may do
/// with them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    /// Whether GDPR applies to this request, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr_applies: Option<bool>,

    /// TCF consent string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_string: Option<String>,

    /// US privacy (CCPA) string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_privacy: Option<String>,
}

/// One request that needs enrichment.
///
/// Owned by the `enrich` call it is handed to and dropped when that call
/// returns.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Caller-supplied payload. Its leaves always survive the merge.
    pub base: Payload,

    /// Providers the caller wants consulted. Order is irrelevant: the
    /// registry's registration order decides merge precedence.
    pub providers: BTreeSet<ProviderName>,

    /// Absolute time by which enrichment must finish
    pub deadline: Instant,

    /// Privacy signals for this request
    pub consent: Option<Consent>,

    /// Host-assigned identifier, used only in logs
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Create a context without consent or request id
    pub fn new<I, S>(base: Payload, providers: I, deadline: Instant) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProviderName>,
    {
        Self {
            base,
            providers: providers.into_iter().map(Into::into).collect(),
            deadline,
            consent: None,
            request_id: None,
        }
    }

    /// Attach privacy signals
    pub fn with_consent(mut self, consent: Consent) -> Self {
        self.consent = Some(consent);
        self
    }

    /// Attach a request id for log correlation
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Label used in log lines
    pub(crate) fn log_label(&self) -> &str {
        self.request_id.as_deref().unwrap_or("-")
    }
}
