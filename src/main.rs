// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use spotter::{
    api::{start_server, AppState, ServerConfig},
    fetch::FetchConfig,
    pipeline::{build_orchestrator, PipelineConfig},
    vision::OnnxDetector,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🚀 Starting Spotter amenity detection service...\n");
    println!("📦 BUILD VERSION: {}", spotter::version::VERSION);
    println!("📅 Build Date: {}", spotter::version::BUILD_DATE);
    println!();
    info!("{}", spotter::version::get_version_string());

    let server_config = ServerConfig::from_env();
    server_config.validate().map_err(anyhow::Error::msg)?;

    let fetch_config = FetchConfig::from_env();
    fetch_config.validate().map_err(anyhow::Error::msg)?;

    let pipeline_config = PipelineConfig::from_env();
    pipeline_config.validate().map_err(anyhow::Error::msg)?;

    info!(
        "Fetch policy: {} attempts, backoff {:?}..{:?}, timeout {}s",
        fetch_config.retry.max_attempts,
        fetch_config.retry.min_delay,
        fetch_config.retry.max_delay,
        fetch_config.timeout_secs
    );
    info!(
        "Detection threshold {}, max concurrent images {}",
        pipeline_config.detection_threshold,
        match pipeline_config.max_concurrent_images {
            0 => "unbounded".to_string(),
            n => n.to_string(),
        }
    );

    let state = AppState::default();

    match &pipeline_config.model_path {
        Some(model_path) => {
            println!("🧠 Loading detection model...");
            let detector = OnnxDetector::load(model_path, pipeline_config.label_ids)
                .context("Failed to load detection model")?;
            let orchestrator =
                build_orchestrator(Arc::new(detector), &fetch_config, &pipeline_config)?;
            state.set_orchestrator(orchestrator).await;
            println!("✅ Detection model ready");
        }
        None => {
            warn!("MODEL_PATH not set: /v1/detect will answer 503 until a model is configured");
        }
    }

    println!("🌐 Listening on http://{}:{}", server_config.host, server_config.port);
    start_server(&server_config, state).await
}
