//! Bidflow RTD Crate
//!
//! This crate enriches outgoing bid requests with Real-Time Data (RTD)
//! fetched from pluggable providers while the request is being built.
//!
//! # Overview
//!
//! The RTD crate supports:
//! - A registry of named providers, filled at startup and read-only after
//! - Concurrent provider calls bounded by per-provider timeouts and an
//!   absolute request deadline
//! - Failure isolation: errors, panics, and timeouts become statuses
//! - A deterministic first-party data (FPD) merge that never overwrites
//!   caller-supplied data
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   Host request   | --> |  RequestContext  |  (base payload, names, deadline)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   Orchestrator   |  (concurrent, time-bounded)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | ProviderRegistry |  (registration order)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   RtdProvider    |  (static, http, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    fpd::merge    |  (add-only, deterministic)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  EnrichedResult  |
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ProviderRegistry`] - Named providers in registration order
//! - [`Orchestrator`] - Runs enrichment against a frozen registry
//! - [`RtdProvider`] - Trait every provider (and test double) implements
//! - [`RequestContext`] - One request to enrich
//! - [`EnrichedResult`] - Merged payload plus per-provider statuses
//! - [`RtdConfig`] - Serde configuration for the built-in providers

pub mod config;
pub mod errors;
pub mod fpd;
pub mod models;
pub mod provider;
pub mod registry;

pub use config::{build_registry, ProviderConfig, ProviderSource, RtdConfig};
pub use errors::{ProviderError, RtdError};
pub use fpd::{merge, MergeConflict, MergeOutcome};
pub use models::{
    Consent, EnrichedResult, Fragment, Payload, ProviderName, ProviderOutcome, ProviderStatus,
    RequestContext,
};
pub use provider::{Capabilities, Capability, HttpProvider, RtdProvider, StaticProvider};
pub use registry::{
    Orchestrator, OrchestratorSettings, Provider, ProviderRegistry, ProviderState, SkipReason,
    MERGE_GRACE,
};
