//! RTD configuration.
//!
//! The configuration mirrors the `realTimeData` block publishers already
//! write:
//!
//! ```json
//! {
//!   "auctionDelay": 200,
//!   "defaultTimeout": 100,
//!   "dataProviders": [
//!     { "name": "site", "source": "static", "params": { "data": { "site": { "cat": ["IAB1"] } } } },
//!     { "name": "geo", "source": "http", "timeout": 80, "params": { "url": "https://geo.example/v1" } }
//!   ]
//! }
//! ```
//!
//! All durations are in milliseconds.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::RtdError;
use crate::models::{Payload, ProviderName};
use crate::provider::{HttpProvider, RtdProvider, StaticProvider};
use crate::registry::{OrchestratorSettings, Provider, ProviderRegistry};

/// Default time budget for one enrichment.
pub const DEFAULT_AUCTION_DELAY_MS: u64 = 200;

/// Default time limit for one provider `init` call.
pub const DEFAULT_INIT_TIMEOUT_MS: u64 = 1_000;

fn default_auction_delay() -> u64 {
    DEFAULT_AUCTION_DELAY_MS
}

fn default_init_timeout() -> u64 {
    DEFAULT_INIT_TIMEOUT_MS
}

/// Built-in provider implementations selectable from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    /// [`StaticProvider`]
    Static,
    /// [`HttpProvider`]
    Http,
}

/// One entry of `dataProviders`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub source: ProviderSource,
    /// Per-call time limit in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub params: Payload,
}

/// Top-level RTD configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtdConfig {
    /// Time budget for one enrichment, in ms
    #[serde(default = "default_auction_delay")]
    pub auction_delay: u64,

    /// Time limit for providers without their own, in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_timeout: Option<u64>,

    /// Time limit for each provider's `init`, in ms
    #[serde(default = "default_init_timeout")]
    pub init_timeout: u64,

    /// Providers, in precedence order
    #[serde(default)]
    pub data_providers: Vec<ProviderConfig>,
}

impl Default for RtdConfig {
    fn default() -> Self {
        Self {
            auction_delay: DEFAULT_AUCTION_DELAY_MS,
            default_timeout: None,
            init_timeout: DEFAULT_INIT_TIMEOUT_MS,
            data_providers: Vec::new(),
        }
    }
}

impl RtdConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, RtdError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RtdError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check what serde cannot.
    ///
    /// # Errors
    ///
    /// [`RtdError::InvalidConfig`] for a zero duration, an empty provider
    /// name, or a provider name used twice.
    pub fn validate(&self) -> Result<(), RtdError> {
        if self.auction_delay == 0 {
            return Err(RtdError::InvalidConfig(
                "auctionDelay must be greater than zero".to_string(),
            ));
        }
        if self.default_timeout == Some(0) {
            return Err(RtdError::InvalidConfig(
                "defaultTimeout must be greater than zero".to_string(),
            ));
        }
        if self.init_timeout == 0 {
            return Err(RtdError::InvalidConfig(
                "initTimeout must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for provider in &self.data_providers {
            if provider.name.trim().is_empty() {
                return Err(RtdError::InvalidConfig(
                    "provider name must not be empty".to_string(),
                ));
            }
            if provider.timeout == Some(0) {
                return Err(RtdError::InvalidConfig(format!(
                    "provider '{}' timeout must be greater than zero",
                    provider.name
                )));
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(RtdError::InvalidConfig(format!(
                    "provider '{}' is configured twice",
                    provider.name
                )));
            }
        }
        Ok(())
    }

    pub fn auction_delay(&self) -> Duration {
        Duration::from_millis(self.auction_delay)
    }

    pub fn init_timeout(&self) -> Duration {
        Duration::from_millis(self.init_timeout)
    }

    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            default_timeout: self.default_timeout.map(Duration::from_millis),
        }
    }

    /// Configured provider names, in order
    pub fn provider_names(&self) -> Vec<ProviderName> {
        self.data_providers.iter().map(|p| p.name.clone()).collect()
    }
}

/// Register every configured provider with its built-in implementation.
///
/// HTTP providers share one client. The registry is returned uninitialized.
pub fn build_registry(config: &RtdConfig) -> Result<ProviderRegistry, RtdError> {
    let static_data: Arc<dyn RtdProvider> = Arc::new(StaticProvider::new());
    let http: Arc<dyn RtdProvider> = Arc::new(HttpProvider::new());

    let mut registry = ProviderRegistry::new();
    for entry in &config.data_providers {
        let handler = match entry.source {
            ProviderSource::Static => static_data.clone(),
            ProviderSource::Http => http.clone(),
        };

        let mut provider = Provider::shared(entry.name.clone(), handler).with_params(entry.params.clone());
        if let Some(timeout) = entry.timeout {
            provider = provider.with_timeout(Duration::from_millis(timeout));
        }
        registry.register(provider)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ProviderState;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "auctionDelay": 150,
        "defaultTimeout": 60,
        "dataProviders": [
            { "name": "site", "source": "static", "params": { "data": { "site": { "cat": ["IAB1"] } } } },
            { "name": "geo", "source": "http", "timeout": 80, "params": { "url": "http://127.0.0.1:9/geo" } }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let config = RtdConfig::from_json_str(SAMPLE).unwrap();

        assert_eq!(config.auction_delay(), Duration::from_millis(150));
        assert_eq!(config.init_timeout(), Duration::from_millis(DEFAULT_INIT_TIMEOUT_MS));
        assert_eq!(
            config.orchestrator_settings().default_timeout,
            Some(Duration::from_millis(60))
        );
        assert_eq!(config.provider_names(), vec!["site", "geo"]);
        assert_eq!(config.data_providers[1].source, ProviderSource::Http);
        assert_eq!(config.data_providers[1].timeout, Some(80));
    }

    #[test]
    fn test_defaults() {
        let config = RtdConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RtdConfig::default());
        assert!(config.orchestrator_settings().default_timeout.is_none());
    }

    #[test]
    fn test_rejects_unknown_source() {
        let result = RtdConfig::from_json_str(
            r#"{ "dataProviders": [{ "name": "x", "source": "ftp" }] }"#,
        );
        assert!(matches!(result, Err(RtdError::Json(_))));
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let zero = RtdConfig {
            auction_delay: 0,
            ..RtdConfig::default()
        };
        assert!(matches!(zero.validate(), Err(RtdError::InvalidConfig(_))));

        let duplicate = RtdConfig::from_json_str(
            r#"{ "dataProviders": [
                { "name": "a", "source": "static" },
                { "name": "a", "source": "http" }
            ] }"#,
        );
        assert!(matches!(duplicate, Err(RtdError::InvalidConfig(msg)) if msg.contains("'a'")));

        let blank = RtdConfig::from_json_str(
            r#"{ "dataProviders": [{ "name": " ", "source": "static" }] }"#,
        );
        assert!(matches!(blank, Err(RtdError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let default_zero = RtdConfig::from_json_str(r#"{ "defaultTimeout": 0 }"#);
        assert!(matches!(default_zero, Err(RtdError::InvalidConfig(msg)) if msg.contains("defaultTimeout")));

        let init_zero = RtdConfig::from_json_str(r#"{ "initTimeout": 0 }"#);
        assert!(matches!(init_zero, Err(RtdError::InvalidConfig(msg)) if msg.contains("initTimeout")));

        let provider_zero = RtdConfig::from_json_str(
            r#"{ "dataProviders": [{ "name": "geo", "source": "http", "timeout": 0 }] }"#,
        );
        assert!(matches!(provider_zero, Err(RtdError::InvalidConfig(msg)) if msg.contains("'geo'")));

        let positive = RtdConfig::from_json_str(
            r#"{ "defaultTimeout": 1, "dataProviders": [{ "name": "geo", "source": "http", "timeout": 1 }] }"#,
        );
        assert!(positive.is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = RtdConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_providers.len(), 2);

        let missing = RtdConfig::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(RtdError::Io(_))));
    }

    #[test]
    fn test_build_registry() {
        let config = RtdConfig::from_json_str(SAMPLE).unwrap();
        let registry = build_registry(&config).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["site", "geo"]);

        let site = registry.get("site").unwrap();
        assert_eq!(site.state(), ProviderState::AwaitingInit);
        assert!(site.params().contains_key("data"));

        let geo = registry.get("geo").unwrap();
        assert_eq!(geo.state(), ProviderState::Ready);
        assert_eq!(geo.timeout(), Some(Duration::from_millis(80)));
    }
}
