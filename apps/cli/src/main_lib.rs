use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use bidflow_rtd::{build_registry, Orchestrator, Payload, RequestContext, RtdConfig};
use serde_json::Value;
use tokio::time::Instant;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Load the RTD configuration and bring every provider up.
pub async fn build_orchestrator(config: &Config) -> anyhow::Result<(Orchestrator, RtdConfig)> {
    let rtd = RtdConfig::from_file(&config.rtd_config)
        .with_context(|| format!("Failed to load {}", config.rtd_config.display()))?;

    let mut registry = build_registry(&rtd)?;
    let declined = registry
        .initialize(config.consent.as_ref(), rtd.init_timeout())
        .await;
    if !declined.is_empty() {
        tracing::warn!("Providers declined to initialize: {}", declined.join(", "));
    }
    tracing::info!(
        "Registered {} RTD providers ({} usable)",
        registry.len(),
        registry.providers().iter().filter(|p| p.is_ready()).count()
    );

    let orchestrator = Orchestrator::with_settings(Arc::new(registry), rtd.orchestrator_settings());
    Ok((orchestrator, rtd))
}

/// Read the base payload from `path`, or stdin when none is given.
pub fn read_payload(path: Option<&Path>) -> anyhow::Result<Payload> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut json = String::new();
            std::io::stdin().read_to_string(&mut json)?;
            json
        }
    };
    parse_payload(&json)
}

pub fn parse_payload(json: &str) -> anyhow::Result<Payload> {
    match serde_json::from_str(json).context("Payload is not valid JSON")? {
        Value::Object(payload) => Ok(payload),
        _ => bail!("Payload must be a JSON object"),
    }
}

/// Build the request for one payload, starting its clock now.
pub fn request_for(payload: Payload, rtd: &RtdConfig, config: &Config) -> RequestContext {
    let request_id = payload.get("id").and_then(Value::as_str).map(String::from);

    let mut context =
        RequestContext::new(payload, rtd.provider_names(), Instant::now() + rtd.auction_delay());
    if let Some(consent) = &config.consent {
        context = context.with_consent(consent.clone());
    }
    if let Some(id) = request_id {
        context = context.with_request_id(id);
    }
    context
}
