//! RTD models
//!
//! This module contains the core data types for enrichment:
//! - `types` - Type aliases for provider names and JSON payloads
//! - `context` - Per-request input (RequestContext) and privacy signals (Consent)
//! - `fragment` - One provider's contribution and its status (Fragment, ProviderStatus)
//! - `result` - The merged output with per-provider summaries (EnrichedResult)

mod context;
mod fragment;
mod result;
mod types;

pub use context::{Consent, RequestContext};
pub use fragment::{Fragment, ProviderStatus};
pub use result::{EnrichedResult, ProviderOutcome};
pub use types::{Payload, ProviderName};
