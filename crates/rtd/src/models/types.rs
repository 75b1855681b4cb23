use serde_json::{Map, Value};

/// Provider name, unique within a registry (e.g., "geo", "audience")
pub type ProviderName = String;

/// A JSON object: base request payloads, fragments, and merged results
pub type Payload = Map<String, Value>;
