// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::DetectionRequest;
use crate::fetch::FetchConfig;
use crate::pipeline::{build_orchestrator, PipelineConfig};
use crate::vision::detector::DEFAULT_DETECTION_THRESHOLD;
use crate::vision::{LabelIds, OnnxDetector};

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// ONNX detection model
    #[arg(long, env = "MODEL_PATH")]
    pub model: PathBuf,

    /// Minimum detection confidence
    #[arg(long, default_value_t = DEFAULT_DETECTION_THRESHOLD)]
    pub threshold: f32,

    /// Font for box labels (system fonts when omitted)
    #[arg(long, env = "LABEL_FONT_PATH")]
    pub font: Option<PathBuf>,

    /// Label id scheme of the model (contiguous or coco)
    #[arg(long, env = "DETECTOR_LABEL_IDS", default_value = "contiguous")]
    pub label_ids: LabelIds,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,

    /// Image URLs to analyze
    #[arg(required = true)]
    pub urls: Vec<String>,
}

/// Run one batch locally and print the response
pub async fn run_detect(args: DetectArgs) -> Result<()> {
    let request = DetectionRequest {
        image_urls: args.urls,
    };
    request.validate().map_err(|e| anyhow!("{}", e))?;

    let fetch_config = FetchConfig::from_env();
    fetch_config.validate().map_err(anyhow::Error::msg)?;

    let pipeline_config = PipelineConfig {
        model_path: Some(args.model.clone()),
        label_ids: args.label_ids,
        detection_threshold: args.threshold,
        label_font_path: args.font,
        ..PipelineConfig::from_env()
    };
    pipeline_config.validate().map_err(anyhow::Error::msg)?;

    let detector = OnnxDetector::load(&args.model, pipeline_config.label_ids)?;
    let orchestrator = build_orchestrator(Arc::new(detector), &fetch_config, &pipeline_config)?;

    let response = orchestrator.process_batch(&request.image_urls).await;
    info!("{}", response.amenities_description);

    let json = if args.compact {
        serde_json::to_string(&response)
    } else {
        serde_json::to_string_pretty(&response)
    }
    .context("Failed to serialize response")?;
    println!("{}", json);

    Ok(())
}
