// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! RT-DETR object detector on ONNX Runtime
//!
//! Expects the RT-DETR deploy export, which folds post-processing into the
//! graph:
//! - inputs: `images` [1, 3, 640, 640] f32, `orig_target_sizes` [1, 2] i64 (width, height)
//! - outputs: `labels` [1, N] i64, `boxes` [1, N, 4] f32 (xyxy, original pixels), `scores` [1, N] f32

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use ndarray::ArrayViewD;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use super::coco::LabelIds;
use super::preprocessing::{preprocess_for_detection, target_size};
use super::{BoundingBox, Detector, RawDetection};

/// ONNX Runtime binding for an RT-DETR export
///
/// The session needs exclusive access to run, so calls are serialized
/// behind a mutex; concurrent pipelines queue here rather than in the
/// orchestrator.
pub struct OnnxDetector {
    session: Mutex<Session>,
    model_name: String,
    label_ids: LabelIds,
}

impl std::fmt::Debug for OnnxDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxDetector")
            .field("model_name", &self.model_name)
            .field("label_ids", &self.label_ids)
            .finish_non_exhaustive()
    }
}

impl OnnxDetector {
    /// Load the detector from an ONNX file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn load<P: AsRef<Path>>(model_path: P, label_ids: LabelIds) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detection model not found: {}", model_path.display());
        }

        info!("Loading detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detection model from {}",
                model_path.display()
            ))?;

        for input in &session.inputs {
            debug!("Detection model input {}: {:?}", input.name, input.input_type);
        }

        let model_name = model_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rt-detr".to_string());

        info!("✅ Detection model '{}' loaded (CPU)", model_name);

        Ok(Self {
            session: Mutex::new(session),
            model_name,
            label_ids,
        })
    }
}

impl Detector for OnnxDetector {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn detect(&self, image: &RgbImage, threshold: f32) -> Result<Vec<RawDetection>> {
        let (width, height) = image.dimensions();
        let input = preprocess_for_detection(image);
        let sizes = target_size(image);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Detection session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![
                "images" => Value::from_array(input).context("Failed to create images tensor")?,
                "orig_target_sizes" => Value::from_array(sizes).context("Failed to create target size tensor")?
            ])
            .context("Detection inference failed")?;

        let labels = outputs["labels"]
            .try_extract_array::<i64>()
            .context("Failed to extract labels tensor")?;
        let boxes = outputs["boxes"]
            .try_extract_array::<f32>()
            .context("Failed to extract boxes tensor")?;
        let scores = outputs["scores"]
            .try_extract_array::<f32>()
            .context("Failed to extract scores tensor")?;

        let detections = collect_detections(
            labels.view(),
            boxes.view(),
            scores.view(),
            (width, height),
            threshold,
            self.label_ids,
        )?;

        debug!(
            "{} detections >= {:.2} on {}x{} image",
            detections.len(),
            threshold,
            width,
            height
        );

        Ok(detections)
    }
}

/// Turn raw model outputs into thresholded, named, in-bounds detections
///
/// Model order is preserved. Unknown label ids and boxes that are empty after
/// clamping to the image are dropped.
pub(crate) fn collect_detections(
    labels: ArrayViewD<i64>,
    boxes: ArrayViewD<f32>,
    scores: ArrayViewD<f32>,
    (width, height): (u32, u32),
    threshold: f32,
    label_ids: LabelIds,
) -> Result<Vec<RawDetection>> {
    let count = scores.len();
    if labels.len() != count || boxes.len() != count * 4 {
        anyhow::bail!(
            "Mismatched detector outputs: labels {:?}, boxes {:?}, scores {:?}",
            labels.shape(),
            boxes.shape(),
            scores.shape()
        );
    }

    let coords: Vec<f32> = boxes.iter().copied().collect();
    let mut detections = Vec::new();

    for ((label_id, score), xyxy) in labels.iter().zip(scores.iter()).zip(coords.chunks(4)) {
        if *score < threshold {
            continue;
        }

        let Some(label) = label_ids.label(*label_id) else {
            debug!("Skipping unknown label id {}", label_id);
            continue;
        };

        let bbox = BoundingBox::new(xyxy[0], xyxy[1], xyxy[2], xyxy[3]).clamp_to(width, height);
        if !bbox.is_valid() {
            continue;
        }

        detections.push(RawDetection {
            label: label.to_string(),
            score: *score,
            bbox,
        });
    }

    Ok(detections)
}
