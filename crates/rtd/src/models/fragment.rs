use serde::{Deserialize, Serialize};

use super::types::{Payload, ProviderName};
use crate::registry::SkipReason;

/// Outcome of one provider call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ProviderStatus {
    /// The provider returned data in time.
    Ok,

    /// The call exceeded its bound and was cancelled.
    TimedOut,

    /// The call returned an error or panicked.
    Errored { message: String },

    /// The provider was not called.
    Skipped { reason: SkipReason },
}

impl ProviderStatus {
    /// Short label, matching the serialized tag
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::TimedOut => "timed-out",
            Self::Errored { .. } => "errored",
            Self::Skipped { .. } => "skipped",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// A single provider's contribution, tagged with where it came from.
///
/// `data` is empty unless `status` is [`ProviderStatus::Ok`].
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    /// Provider that produced this fragment
    pub provider: ProviderName,

    /// How the call ended
    pub status: ProviderStatus,

    /// Enrichment data
    pub data: Payload,
}

impl Fragment {
    /// A successful contribution
    pub fn ok(provider: impl Into<ProviderName>, data: Payload) -> Self {
        Self {
            provider: provider.into(),
            status: ProviderStatus::Ok,
            data,
        }
    }

    /// A call that ran out of time
    pub fn timed_out(provider: impl Into<ProviderName>) -> Self {
        Self::without_data(provider, ProviderStatus::TimedOut)
    }

    /// A call that failed
    pub fn errored(provider: impl Into<ProviderName>, message: impl Into<String>) -> Self {
        Self::without_data(
            provider,
            ProviderStatus::Errored {
                message: message.into(),
            },
        )
    }

    /// A provider that was never called
    pub fn skipped(provider: impl Into<ProviderName>, reason: SkipReason) -> Self {
        Self::without_data(provider, ProviderStatus::Skipped { reason })
    }

    fn without_data(provider: impl Into<ProviderName>, status: ProviderStatus) -> Self {
        Self {
            provider: provider.into(),
            status,
            data: Payload::new(),
        }
    }
}
