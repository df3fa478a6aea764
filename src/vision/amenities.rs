// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Mapping of COCO detector labels to property amenities

use std::collections::BTreeMap;

/// Detector label -> amenity name. Labels not listed are ignored.
pub const AMENITY_VOCABULARY: &[(&str, &str)] = &[
    // Kitchen
    ("refrigerator", "refrigerator"),
    ("oven", "oven"),
    ("microwave", "microwave"),
    ("sink", "sink"), // kitchen or bathroom
    ("dining table", "dining area"),
    ("toaster", "toaster"),
    ("wine glass", "kitchen"),
    ("cup", "kitchen"),
    ("fork", "kitchen"),
    ("knife", "kitchen"),
    ("spoon", "kitchen"),
    ("bowl", "kitchen"),
    // Living area
    ("tv", "TV"),
    ("couch", "sofa"),
    ("chair", "chair"),
    // Bedroom
    ("bed", "bed"),
    // Bathroom
    ("toilet", "bathroom"),
    ("hair drier", "hair dryer"),
    // Workspace
    ("laptop", "workspace"),
    ("mouse", "workspace"),
    ("keyboard", "workspace"),
    // Outdoor
    ("car", "parking"),
];

/// Look up the amenity for a detector label
pub fn amenity_for(label: &str) -> Option<&'static str> {
    AMENITY_VOCABULARY
        .iter()
        .find(|(detector_label, _)| *detector_label == label)
        .map(|(_, amenity)| *amenity)
}

/// The full vocabulary, ordered by detector label
pub fn vocabulary() -> BTreeMap<&'static str, &'static str> {
    AMENITY_VOCABULARY.iter().copied().collect()
}
