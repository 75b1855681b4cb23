//! Why a selected provider was not called.

use serde::{Deserialize, Serialize};

use super::ProviderState;

/// Why a provider was skipped during enrichment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Provider requires `init` and the registry was never initialized.
    InitPending,

    /// Provider's `init` declined, failed, or timed out.
    InitDeclined,
}

impl SkipReason {
    /// Skip reason for a provider in the given state, `None` when it is ready.
    pub fn for_state(state: ProviderState) -> Option<Self> {
        match state {
            ProviderState::Ready => None,
            ProviderState::AwaitingInit => Some(Self::InitPending),
            ProviderState::Declined => Some(Self::InitDeclined),
        }
    }
}
