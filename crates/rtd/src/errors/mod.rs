//! Error types for the RTD crate.
//!
//! This module provides:
//! - [`RtdError`]: Errors returned to the host from registration, lookup,
//!   configuration, and enrichment calls
//! - [`ProviderError`]: Errors raised by a single provider call
//!
//! Provider errors never escape an enrichment call. The orchestrator turns
//! them into a status on the [`EnrichedResult`](crate::models::EnrichedResult).

use thiserror::Error;

/// Errors returned to the host application.
///
/// Each of these is fatal to the call that produced it and nothing else.
#[derive(Error, Debug)]
pub enum RtdError {
    /// A provider with the same name is already registered.
    /// The registry is left unchanged.
    #[error("Provider already registered: {0}")]
    DuplicateProvider(String),

    /// No provider is registered under this name.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The request deadline is not in the future.
    #[error("Deadline already elapsed")]
    DeadlineElapsed,

    /// The configuration is structurally valid JSON but semantically wrong.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing JSON input failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a provider call.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider failed to produce data.
    #[error("Provider error: {provider} - {message}")]
    Fetch {
        /// The provider that failed
        provider: String,
        /// Description of the failure
        message: String,
    },

    /// The provider does not implement the requested operation.
    #[error("Operation {operation} not supported by {provider}")]
    NotSupported {
        /// The operation that was requested
        operation: String,
        /// The provider it was requested from
        provider: String,
    },

    /// The provider's params are missing a field or have the wrong shape.
    #[error("Invalid params for {provider}: {message}")]
    InvalidParams {
        /// The provider whose params were rejected
        provider: String,
        /// What was wrong
        message: String,
    },

    /// The upstream answered, but with something the provider cannot use.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that received the response
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// A network error occurred while talking to the upstream.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProviderError {
    /// Shorthand for a [`ProviderError::Fetch`].
    pub fn fetch(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`ProviderError::InvalidParams`].
    pub fn invalid_params(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
