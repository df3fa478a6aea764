// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Drawing detection boxes and labels onto images

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::detector::BoundingBox;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_WIDTH: i32 = 3;
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_OUTLINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const TEXT_OFFSET: i32 = 5;
const LABEL_FONT_SIZE: f32 = 16.0;

/// Fonts tried when no explicit font path is configured
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Draws red boxes with white, black-outlined labels
///
/// Without a font only the boxes are drawn.
pub struct Annotator {
    font: Option<FontVec>,
    scale: PxScale,
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("has_font", &self.font.is_some())
            .field("scale", &self.scale.y)
            .finish()
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Annotator {
    /// Create an annotator, loading the label font from `font_path` or, when
    /// unset, from the first readable system font
    pub fn new(font_path: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match font_path {
            Some(path) => vec![path.to_path_buf()],
            None => SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        };

        let font = candidates.iter().find_map(|path| load_font(path));

        if font.is_none() {
            match font_path {
                Some(path) => warn!(
                    "Label font {} could not be loaded, images will carry boxes only",
                    path.display()
                ),
                None => warn!("No system font found for labels, images will carry boxes only"),
            }
        }

        Self {
            font,
            scale: PxScale::from(LABEL_FONT_SIZE),
        }
    }

    /// Annotator that never draws text
    pub fn boxes_only() -> Self {
        Self {
            font: None,
            scale: PxScale::from(LABEL_FONT_SIZE),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw every `(label, box)` pair onto `image`
    pub fn annotate<'a, I>(&self, image: &mut RgbImage, detections: I)
    where
        I: IntoIterator<Item = (&'a str, &'a BoundingBox)>,
    {
        for (label, bbox) in detections {
            self.draw_box(image, bbox);
            self.draw_label(image, label, bbox);
        }
    }

    fn draw_box(&self, image: &mut RgbImage, bbox: &BoundingBox) {
        let x0 = bbox.xmin().round() as i32;
        let y0 = bbox.ymin().round() as i32;
        let x1 = bbox.xmax().round() as i32;
        let y1 = bbox.ymax().round() as i32;

        // Stroke grows inward from the box edge
        for inset in 0..BOX_WIDTH {
            let (left, top) = (x0 + inset, y0 + inset);
            let (right, bottom) = (x1 - inset, y1 - inset);
            if right <= left || bottom <= top {
                break;
            }
            let rect = Rect::at(left, top).of_size((right - left) as u32, (bottom - top) as u32);
            draw_hollow_rect_mut(image, rect, BOX_COLOR);
        }
    }

    fn draw_label(&self, image: &mut RgbImage, label: &str, bbox: &BoundingBox) {
        let Some(font) = &self.font else {
            return;
        };

        let x = bbox.xmin().round() as i32 + TEXT_OFFSET;
        let y = bbox.ymin().round() as i32 + TEXT_OFFSET;

        for (dx, dy) in [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ] {
            draw_text_mut(image, TEXT_OUTLINE_COLOR, x + dx, y + dy, self.scale, font, label);
        }
        draw_text_mut(image, TEXT_COLOR, x, y, self.scale, font, label);
    }
}

fn load_font(path: &Path) -> Option<FontVec> {
    let data = std::fs::read(path).ok()?;
    match FontVec::try_from_vec(data) {
        Ok(font) => {
            info!("Loaded label font from {}", path.display());
            Some(font)
        }
        Err(e) => {
            warn!("Invalid font file {}: {}", path.display(), e);
            None
        }
    }
}
