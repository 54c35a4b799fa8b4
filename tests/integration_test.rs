//! Integration tests for the complete detection and comparison pipeline
//!
//! These tests validate the end-to-end workflow on synthetic connector
//! images drawn with OpenCV:
//! - Connector segmentation and wire region cropping
//! - Edge scanning, pairing and color sampling
//! - Single- and dual-sided comparison
//! - Error handling for bad input

use opencv::core::Rect;
use std::path::Path;
use wire_sequence::{
    detect_sequence, detect_sequence_with_config, image_loader::load_image, Bgr, ExpectedSequence,
    InspectionError, InspectionMode, Inspector, PipelineConfig, RasterImage, SequenceBuilder, Side,
};

const RED: Bgr = Bgr::new(0, 0, 255);
const GREEN: Bgr = Bgr::new(0, 255, 0);
const BLUE: Bgr = Bgr::new(255, 0, 0);

/// White background, dark housing at the bottom, 16px wires rising from it
fn connector_scene(wires: &[Bgr]) -> RasterImage {
    let mut image = RasterImage::filled(600, 400, [255, 255, 255])
        .unwrap()
        .with_filled_rect(Rect::new(150, 250, 300, 100), [30, 30, 30])
        .unwrap();

    for (i, color) in wires.iter().enumerate() {
        let x = 200 + 36 * i as i32;
        image = image.with_filled_rect(Rect::new(x, 0, 16, 250), (*color).into()).unwrap();
    }
    image
}

// ============================================================================
// Detection
// ============================================================================

#[test]
fn test_detects_three_wires_in_order() {
    let image = connector_scene(&[RED, GREEN, BLUE]);
    let sequence = detect_sequence(&image).unwrap();

    assert_eq!(sequence.count(), 3);
    let truth = [RED, GREEN, BLUE];
    for (detected, expected) in sequence.colors().iter().zip(truth.iter()) {
        assert!(
            detected.distance(expected) <= 50.0,
            "detected {} too far from {}",
            detected,
            expected
        );
    }
}

#[test]
fn test_detection_is_deterministic() {
    let image = connector_scene(&[BLUE, RED]);

    let first = detect_sequence(&image).unwrap();
    let second = detect_sequence(&image).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.count(), 2);
}

#[test]
fn test_detailed_detection_is_consistent() {
    let config = PipelineConfig::default();
    let image = connector_scene(&[RED, GREEN, BLUE]);

    let detection = SequenceBuilder::new(&config).build_detailed(&image).unwrap();

    assert!(detection.crop_window.is_some());
    assert!(detection.scan_row.is_some());
    assert_eq!(detection.bodies.len(), detection.sequence.count());
    for pair in detection.segments.windows(2) {
        assert!(pair[0].end_x < pair[1].start_x);
    }
    for pair in detection.bodies.windows(2) {
        assert!(pair[0].center_x < pair[1].center_x);
        assert!(pair[0].right.end_x < pair[1].left.start_x);
    }
}

#[test]
fn test_blank_image_has_no_wires() {
    let image = RasterImage::filled(320, 240, [255, 255, 255]).unwrap();
    let sequence = detect_sequence(&image).unwrap();

    assert_eq!(sequence.count(), 0);
    assert!(sequence.colors().is_empty());
}

#[test]
fn test_scan_row_below_wires_finds_nothing() {
    let mut config = PipelineConfig::default();
    // Row 300 crosses the housing only; its two edges are too far apart to pair
    config.edges.scan_row = 300;

    let image = connector_scene(&[RED, GREEN, BLUE]);
    let sequence = detect_sequence_with_config(&image, &config).unwrap();

    assert_eq!(sequence.count(), 0);
}

#[test]
fn test_loaded_png_matches_in_memory_detection() {
    let image = connector_scene(&[GREEN, BLUE]);
    let in_memory = detect_sequence(&image).unwrap();

    // Round-trip the scene through a PNG file
    let mut rgb = image::RgbImage::new(image.width() as u32, image.height() as u32);
    for y in 0..image.height() {
        for x in 0..image.width() {
            let [b, g, r] = image.pixel(x, y).unwrap();
            rgb.put_pixel(x as u32, y as u32, image::Rgb([r, g, b]));
        }
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("connector.png");
    rgb.save(&path).unwrap();

    let loaded = load_image(&path).unwrap();
    assert_eq!(detect_sequence(&loaded).unwrap(), in_memory);
}

// ============================================================================
// Inspection
// ============================================================================

#[test]
fn test_single_sided_inspection_passes() {
    let inspector = Inspector::new();
    let image = connector_scene(&[RED, GREEN, BLUE]);
    let expected = ExpectedSequence::from_colors(vec![RED, GREEN, BLUE]);

    let result = inspector
        .inspect(InspectionMode::SingleSided, &[image], &[expected])
        .unwrap();

    assert!(result.matched, "details: {}", result.details);
    assert_eq!(result.details, "SUCCESSFUL");
}

#[test]
fn test_single_sided_swapped_wires_fail() {
    let inspector = Inspector::new();
    let image = connector_scene(&[RED, GREEN, BLUE]);
    let expected = ExpectedSequence::from_colors(vec![RED, BLUE, GREEN]);

    let result = inspector
        .inspect(InspectionMode::SingleSided, &[image], &[expected])
        .unwrap();

    assert!(!result.matched);
    assert!(result.details.contains("Wire 2"));
    assert!(result.details.contains("Wire 3"));
    assert!(!result.details.contains("Wire 1:"));
}

#[test]
fn test_missing_wire_reports_count_only() {
    let inspector = Inspector::new();
    let image = connector_scene(&[RED, GREEN]);
    let expected = ExpectedSequence::from_colors(vec![RED, GREEN, BLUE]);

    let result = inspector
        .inspect(InspectionMode::SingleSided, &[image], &[expected])
        .unwrap();

    assert!(!result.matched);
    assert_eq!(result.details, "Wire count mismatch: expected 3, detected 2");
}

#[test]
fn test_dual_sided_with_empty_front() {
    let inspector = Inspector::new();
    let front = RasterImage::filled(600, 400, [255, 255, 255]).unwrap();
    let back = connector_scene(&[BLUE, RED]);

    let result = inspector
        .inspect(
            InspectionMode::DualSided,
            &[front, back],
            &[ExpectedSequence::empty(), ExpectedSequence::from_colors(vec![BLUE, RED])],
        )
        .unwrap();

    assert!(result.matched, "details: {}", result.details);
    assert_eq!(result.sides[0].side, Some(Side::Front));
    assert_eq!(result.sides[1].detected_count, 2);
}

#[test]
fn test_dual_sided_failure_is_labelled() {
    let inspector = Inspector::new();
    let front = connector_scene(&[RED]);
    let back = connector_scene(&[GREEN]);

    let result = inspector
        .inspect(
            InspectionMode::DualSided,
            &[front, back],
            &[
                ExpectedSequence::from_colors(vec![RED]),
                ExpectedSequence::from_colors(vec![BLUE]),
            ],
        )
        .unwrap();

    assert!(!result.matched);
    assert!(result.sides[0].matched);
    assert!(result.details.starts_with("[back] Wire 1:"));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_unknown_mode_flag() {
    let err = "triplewire".parse::<InspectionMode>().unwrap_err();
    assert!(matches!(err, InspectionError::InvalidMode { .. }));
}

#[test]
fn test_image_count_must_fit_mode() {
    let inspector = Inspector::new();
    let image = connector_scene(&[RED]);

    let err = inspector
        .inspect(InspectionMode::DualSided, &[image], &[ExpectedSequence::empty(), ExpectedSequence::empty()])
        .unwrap_err();
    assert!(matches!(err, InspectionError::InvalidMode { .. }));
}

#[test]
fn test_load_missing_file() {
    let err = load_image(Path::new("nonexistent_connector.jpg")).unwrap_err();
    assert!(matches!(err, InspectionError::ImageLoadError { .. }));
}

#[test]
fn test_config_file_roundtrip_drives_detection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = PipelineConfig::default();
    config.comparison.color_threshold = 10.0;
    config.to_json_file(&path).unwrap();

    let loaded = PipelineConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);

    let inspector = Inspector::with_config(loaded).unwrap();
    let image = connector_scene(&[RED, GREEN, BLUE]);
    let expected = ExpectedSequence::from_colors(vec![RED, GREEN, BLUE]);
    let result = inspector
        .inspect(InspectionMode::SingleSided, &[image], &[expected])
        .unwrap();
    assert!(result.matched, "details: {}", result.details);
}
