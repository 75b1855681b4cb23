//! Provider registry module.
//!
//! This module provides orchestration for RTD providers, including:
//! - Provider registration and lookup by name or capability
//! - One-time provider initialization
//! - Concurrent, time-bounded enrichment with per-provider isolation
//! - Skip reasons for providers that were selected but not called

mod bounded;
mod orchestrator;
#[allow(clippy::module_inception)]
mod registry;
mod skip_reason;

pub use orchestrator::{Orchestrator, OrchestratorSettings, MERGE_GRACE};
pub use registry::{Provider, ProviderRegistry, ProviderState};
pub use skip_reason::SkipReason;
