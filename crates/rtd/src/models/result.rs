use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::fragment::ProviderStatus;
use super::types::{Payload, ProviderName};
use crate::fpd::MergeConflict;

/// Status of one provider within an enrichment call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOutcome {
    pub provider: ProviderName,
    #[serde(flatten)]
    pub status: ProviderStatus,
}

/// Result of an enrichment call.
///
/// Summaries are listed in registration order, not completion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedResult {
    /// Base payload plus every accepted provider leaf
    pub payload: Payload,

    /// Fetch-phase status per selected provider
    pub statuses: Vec<ProviderOutcome>,

    /// Alteration-phase status per selected provider that can alter requests
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alterations: Vec<ProviderOutcome>,

    /// Provider leaves dropped because an earlier writer owned the path
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<MergeConflict>,
}

impl EnrichedResult {
    /// Result for a request that consulted no provider
    pub fn unchanged(base: Payload) -> Self {
        Self {
            payload: base,
            ..Self::default()
        }
    }

    /// Fetch-phase status for a provider, if it was selected
    pub fn status(&self, provider: &str) -> Option<&ProviderStatus> {
        find(&self.statuses, provider)
    }

    /// Alteration-phase status for a provider, if it took part
    pub fn alteration(&self, provider: &str) -> Option<&ProviderStatus> {
        find(&self.alterations, provider)
    }

    /// Fetch-phase status labels keyed by provider name
    pub fn status_labels(&self) -> BTreeMap<&str, &'static str> {
        self.statuses
            .iter()
            .map(|o| (o.provider.as_str(), o.status.label()))
            .collect()
    }

    /// True when every selected provider returned data
    pub fn is_complete(&self) -> bool {
        self.statuses.iter().all(|o| o.status.is_ok())
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        if self.statuses.is_empty() {
            return "no providers".to_string();
        }
        self.statuses
            .iter()
            .map(|o| match &o.status {
                ProviderStatus::Errored { message } => format!("{}: errored ({})", o.provider, message),
                ProviderStatus::Skipped { reason } => format!("{}: skipped ({:?})", o.provider, reason),
                status => format!("{}: {}", o.provider, status.label()),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn find<'a>(outcomes: &'a [ProviderOutcome], provider: &str) -> Option<&'a ProviderStatus> {
    outcomes
        .iter()
        .find(|o| o.provider == provider)
        .map(|o| &o.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SkipReason;
    use serde_json::json;

    fn outcome(provider: &str, status: ProviderStatus) -> ProviderOutcome {
        ProviderOutcome {
            provider: provider.to_string(),
            status,
        }
    }

    #[test]
    fn test_status_lookup() {
        let result = EnrichedResult {
            statuses: vec![
                outcome("geo", ProviderStatus::Ok),
                outcome("demo", ProviderStatus::TimedOut),
            ],
            ..EnrichedResult::default()
        };

        assert_eq!(result.status("geo"), Some(&ProviderStatus::Ok));
        assert_eq!(result.status("demo"), Some(&ProviderStatus::TimedOut));
        assert_eq!(result.status("missing"), None);
        assert!(!result.is_complete());

        let labels = result.status_labels();
        assert_eq!(labels.get("geo"), Some(&"ok"));
        assert_eq!(labels.get("demo"), Some(&"timed-out"));
    }

    #[test]
    fn test_summary() {
        let result = EnrichedResult {
            statuses: vec![
                outcome("geo", ProviderStatus::Ok),
                outcome(
                    "audience",
                    ProviderStatus::Errored {
                        message: "boom".to_string(),
                    },
                ),
                outcome(
                    "ids",
                    ProviderStatus::Skipped {
                        reason: SkipReason::InitDeclined,
                    },
                ),
            ],
            ..EnrichedResult::default()
        };

        let summary = result.summary();
        assert!(summary.contains("geo: ok"));
        assert!(summary.contains("audience: errored (boom)"));
        assert!(summary.contains("ids: skipped"));
        assert_eq!(EnrichedResult::default().summary(), "no providers");
    }

    #[test]
    fn test_serialize_flattens_status() {
        let result = EnrichedResult {
            payload: json!({ "country": "US" }).as_object().cloned().unwrap(),
            statuses: vec![outcome("geo", ProviderStatus::Ok)],
            ..EnrichedResult::default()
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "payload": { "country": "US" },
                "statuses": [{ "provider": "geo", "status": "ok" }]
            })
        );
    }
}
