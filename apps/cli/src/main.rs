mod config;
mod main_lib;

use std::path::PathBuf;

use config::Config;
use main_lib::{build_orchestrator, init_tracing, read_payload, request_for};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);
    let (orchestrator, rtd) = build_orchestrator(&config).await?;

    let payload_path = std::env::args_os().nth(1).map(PathBuf::from);
    let payload = read_payload(payload_path.as_deref())?;

    let result = orchestrator.enrich(request_for(payload, &rtd, &config)).await?;
    tracing::info!("Enrichment finished: {}", result.summary());

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
