//! RTD provider abstractions and built-in implementations.
//!
//! This module contains:
//! - The `RtdProvider` trait that all providers implement
//! - Provider capabilities (`Capabilities`, `Capability`)
//! - Built-in providers: `StaticProvider` (configured data) and
//!   `HttpProvider` (remote JSON)
//!
//! Providers are stateless with respect to registration: the name, params,
//! and timeout a provider runs with live on its registry entry and are
//! passed in on every call.

mod capabilities;
pub mod params;
mod traits;

pub mod http;
pub mod static_data;

// Re-exports
pub use capabilities::{Capabilities, Capability};
pub use http::HttpProvider;
pub use static_data::StaticProvider;
pub use traits::RtdProvider;
