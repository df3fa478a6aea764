// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the RT-DETR detector

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{arr2, Array2, Array4};

/// Square input resolution of the detector
pub const DETECTOR_INPUT_SIZE: u32 = 640;

/// Preprocess an image for the detector
///
/// Steps:
/// 1. Stretch-resize to DETECTOR_INPUT_SIZE x DETECTOR_INPUT_SIZE (bilinear)
/// 2. Scale pixels to [0, 1] (RT-DETR applies no mean/std normalization)
/// 3. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_detection(image: &RgbImage) -> Array4<f32> {
    let resized = imageops::resize(
        image,
        DETECTOR_INPUT_SIZE,
        DETECTOR_INPUT_SIZE,
        FilterType::Triangle,
    );

    let size = DETECTOR_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    tensor
}

/// `orig_target_sizes` input: `[[width, height]]` of the original image
pub fn target_size(image: &RgbImage) -> Array2<i64> {
    let (width, height) = image.dimensions();
    arr2(&[[width as i64, height as i64]])
}
