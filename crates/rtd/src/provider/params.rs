//! Typed readers for a provider's opaque params object.

use std::time::Duration;

use serde_json::Value;

use crate::errors::ProviderError;
use crate::models::Payload;

/// Required nested object.
pub fn object<'a>(
    provider: &str,
    params: &'a Payload,
    key: &str,
) -> Result<&'a Payload, ProviderError> {
    match params.get(key) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ProviderError::invalid_params(
            provider,
            format!("'{}' must be an object", key),
        )),
        None => Err(ProviderError::invalid_params(
            provider,
            format!("missing '{}'", key),
        )),
    }
}

/// Required string.
pub fn string<'a>(provider: &str, params: &'a Payload, key: &str) -> Result<&'a str, ProviderError> {
    match params.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ProviderError::invalid_params(
            provider,
            format!("'{}' must be a string", key),
        )),
        None => Err(ProviderError::invalid_params(
            provider,
            format!("missing '{}'", key),
        )),
    }
}

/// Optional string.
pub fn opt_string<'a>(
    provider: &str,
    params: &'a Payload,
    key: &str,
) -> Result<Option<&'a str>, ProviderError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => string(provider, params, key).map(Some),
    }
}

/// Optional duration given in milliseconds.
pub fn opt_millis(
    provider: &str,
    params: &Payload,
    key: &str,
) -> Result<Option<Duration>, ProviderError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Duration::from_millis).map(Some).ok_or_else(|| {
            ProviderError::invalid_params(
                provider,
                format!("'{}' must be a non-negative integer", key),
            )
        }),
    }
}
