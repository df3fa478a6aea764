// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! COCO object categories

use std::str::FromStr;

/// The 80 COCO detection categories in contiguous (0-79) order
pub const COCO_LABELS: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// Original COCO category ids (1-90, with gaps), aligned with `COCO_LABELS`
pub const COCO_CATEGORY_IDS: [i64; 80] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 27,
    28, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 46, 47, 48, 49, 50, 51, 52, 53,
    54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 67, 70, 72, 73, 74, 75, 76, 77, 78, 79, 80,
    81, 82, 84, 85, 86, 87, 88, 89, 90,
];

/// How a model numbers its output labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelIds {
    /// 0-79 index into `COCO_LABELS`
    #[default]
    Contiguous,
    /// Original COCO category ids (exports built with category remapping)
    CocoCategory,
}

impl LabelIds {
    /// Resolve a model label id to its category name
    pub fn label(&self, id: i64) -> Option<&'static str> {
        match self {
            LabelIds::Contiguous => usize::try_from(id)
                .ok()
                .and_then(|index| COCO_LABELS.get(index))
                .copied(),
            LabelIds::CocoCategory => COCO_CATEGORY_IDS
                .iter()
                .position(|category| *category == id)
                .map(|index| COCO_LABELS[index]),
        }
    }
}

impl FromStr for LabelIds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contiguous" => Ok(LabelIds::Contiguous),
            "coco" | "coco-category" => Ok(LabelIds::CocoCategory),
            other => Err(format!(
                "unknown label id scheme '{}', expected 'contiguous' or 'coco'",
                other
            )),
        }
    }
}
