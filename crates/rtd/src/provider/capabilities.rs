//! Provider capabilities.
//!
//! This module defines what a provider declares it can do. The registry
//! lists providers by capability and the orchestrator only calls the
//! operations a provider declared.

use serde::{Deserialize, Serialize};

/// One operation a provider may implement.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// One-time setup at startup; may decline to take part.
    Init,

    /// Fetch data for a request.
    FetchData,

    /// Add to the merged request after all fetches are in.
    AlterBidRequest,
}

/// Describes the capabilities of an RTD provider.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Capabilities {
    /// Whether `init` must run before the provider is usable.
    pub init: bool,

    /// Whether the provider supports `fetch_data`.
    pub fetch_data: bool,

    /// Whether the provider supports `alter_bid_request`.
    pub alter_bid_request: bool,
}

impl Capabilities {
    /// A provider that only fetches data
    pub const fn fetch_only() -> Self {
        Self {
            init: false,
            fetch_data: true,
            alter_bid_request: false,
        }
    }

    /// Also require `init` before use
    pub const fn with_init(mut self) -> Self {
        self.init = true;
        self
    }

    /// Also alter the merged request
    pub const fn with_alter_bid_request(mut self) -> Self {
        self.alter_bid_request = true;
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Init => self.init,
            Capability::FetchData => self.fetch_data,
            Capability::AlterBidRequest => self.alter_bid_request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_only() {
        let caps = Capabilities::fetch_only();
        assert!(caps.supports(Capability::FetchData));
        assert!(!caps.supports(Capability::Init));
        assert!(!caps.supports(Capability::AlterBidRequest));
    }

    #[test]
    fn test_builders_compose() {
        let caps = Capabilities::fetch_only()
            .with_init()
            .with_alter_bid_request();
        assert!(caps.supports(Capability::Init));
        assert!(caps.supports(Capability::FetchData));
        assert!(caps.supports(Capability::AlterBidRequest));
    }
}
