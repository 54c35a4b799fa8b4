//! Configuration structures for the wire sequence pipeline.
//!
//! Every tunable value of the detection and comparison stages lives in one
//! immutable [`PipelineConfig`] that is handed to each stage by reference.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use wire_sequence::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file (missing sections fall back to defaults)
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), wire_sequence::InspectionError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`SegmentationConfig`]: blur, adaptive threshold and morphology
//! - [`RoiConfig`]: crop expansion around the connector
//! - [`EdgeScanConfig`]: Canny thresholds and the scan row
//! - [`PairingConfig`]: wire body width and spacing limits
//! - [`SamplingConfig`]: color sampling window
//! - [`ComparisonConfig`]: color match threshold

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{self, limits};
use crate::{InspectionError, Result};

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Connector segmentation
    pub segmentation: SegmentationConfig,

    /// Region-of-interest cropping
    pub roi: RoiConfig,

    /// Wire boundary detection
    pub edges: EdgeScanConfig,

    /// Boundary pairing
    pub pairing: PairingConfig,

    /// Color sampling
    pub sampling: SamplingConfig,

    /// Sequence comparison
    pub comparison: ComparisonConfig,
}

/// Connector segmentation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Gaussian blur kernel size (must be odd)
    pub blur_kernel_size: i32,

    /// Adaptive threshold neighborhood size (must be odd, >= 3)
    pub adaptive_block_size: i32,

    /// Adaptive threshold constant offset
    pub adaptive_offset: f64,

    /// Morphological kernel size
    pub morph_kernel_size: i32,

    /// Closing iterations
    pub close_iterations: i32,

    /// Opening iterations
    pub open_iterations: i32,

    /// Mask mean above which polarity is considered inverted (0-255)
    pub polarity_threshold: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: constants::segmentation::BLUR_KERNEL_SIZE,
            adaptive_block_size: constants::segmentation::ADAPTIVE_BLOCK_SIZE,
            adaptive_offset: constants::segmentation::ADAPTIVE_OFFSET,
            morph_kernel_size: constants::segmentation::MORPH_KERNEL_SIZE,
            close_iterations: constants::segmentation::CLOSE_ITERATIONS,
            open_iterations: constants::segmentation::OPEN_ITERATIONS,
            polarity_threshold: constants::segmentation::POLARITY_THRESHOLD,
        }
    }
}

/// Crop window expansion factors, relative to the connector bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    /// Upward expansion as a multiple of box height
    pub expand_up: f64,

    /// Downward expansion as a multiple of box height
    pub expand_down: f64,

    /// Expansion on each side as a multiple of box width
    pub expand_horizontal: f64,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            expand_up: constants::roi::EXPAND_UP,
            expand_down: constants::roi::EXPAND_DOWN,
            expand_horizontal: constants::roi::EXPAND_HORIZONTAL,
        }
    }
}

/// Edge detection and scan line parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeScanConfig {
    /// Canny edge detection low threshold
    pub canny_low_threshold: f64,

    /// Canny edge detection high threshold
    pub canny_high_threshold: f64,

    /// Canny Sobel aperture (3, 5 or 7)
    pub canny_aperture: i32,

    /// Scan row in cropped image coordinates (clamped to the image)
    pub scan_row: i32,

    /// Minimum edge run width in pixels
    pub min_segment_width: i32,
}

impl Default for EdgeScanConfig {
    fn default() -> Self {
        Self {
            canny_low_threshold: constants::edges::CANNY_LOW_THRESHOLD,
            canny_high_threshold: constants::edges::CANNY_HIGH_THRESHOLD,
            canny_aperture: constants::edges::CANNY_APERTURE,
            scan_row: constants::edges::SCAN_ROW,
            min_segment_width: constants::edges::MIN_SEGMENT_WIDTH,
        }
    }
}

/// Boundary pairing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Minimum wire body width (exclusive)
    pub min_body_width: i32,

    /// Minimum spacing after the previously accepted wire
    pub min_spacing: i32,

    /// Maximum edge gap as a multiple of `min_body_width` (exclusive)
    pub max_gap_factor: i32,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            min_body_width: constants::pairing::MIN_BODY_WIDTH,
            min_spacing: constants::pairing::MIN_SPACING,
            max_gap_factor: constants::pairing::MAX_GAP_FACTOR,
        }
    }
}

/// Color sampling window parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Sampling window width
    pub sample_width: i32,

    /// Fallback window offset from the left edge
    pub sample_offset: i32,

    /// Half-height of the sampling strip
    pub strip_height: i32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_width: constants::sampling::SAMPLE_WIDTH,
            sample_offset: constants::sampling::SAMPLE_OFFSET,
            strip_height: constants::sampling::STRIP_HEIGHT,
        }
    }
}

/// Sequence comparison parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Maximum Euclidean BGR distance for a color match
    pub color_threshold: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            color_threshold: constants::comparison::COLOR_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InspectionError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            InspectionError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| InspectionError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            InspectionError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Check that every value is usable by the OpenCV stages
    ///
    /// Integer settings are bounded above so that window and gap arithmetic
    /// in the stages stays within `i32`.
    pub fn validate(&self) -> Result<()> {
        let seg = &self.segmentation;
        require_odd_kernel("segmentation.blur_kernel_size", seg.blur_kernel_size)?;
        require_odd_kernel("segmentation.adaptive_block_size", seg.adaptive_block_size)?;
        require_extent("segmentation.morph_kernel_size", seg.morph_kernel_size, 1)?;
        require_iterations("segmentation.close_iterations", seg.close_iterations)?;
        require_iterations("segmentation.open_iterations", seg.open_iterations)?;
        require(
            "segmentation.adaptive_offset",
            seg.adaptive_offset,
            (-255.0..=255.0).contains(&seg.adaptive_offset),
        )?;
        require(
            "segmentation.polarity_threshold",
            seg.polarity_threshold,
            (0.0..=255.0).contains(&seg.polarity_threshold),
        )?;

        let roi = &self.roi;
        for (name, value) in [
            ("roi.expand_up", roi.expand_up),
            ("roi.expand_down", roi.expand_down),
            ("roi.expand_horizontal", roi.expand_horizontal),
        ] {
            require(name, value, value.is_finite() && value >= 0.0)?;
        }

        let edges = &self.edges;
        require(
            "edges.canny_low_threshold",
            edges.canny_low_threshold,
            edges.canny_low_threshold.is_finite() && edges.canny_low_threshold >= 0.0,
        )?;
        require(
            "edges.canny_high_threshold",
            edges.canny_high_threshold,
            edges.canny_high_threshold.is_finite() && edges.canny_high_threshold >= edges.canny_low_threshold,
        )?;
        require(
            "edges.canny_aperture",
            edges.canny_aperture,
            matches!(edges.canny_aperture, 3 | 5 | 7),
        )?;
        require_extent("edges.scan_row", edges.scan_row, 0)?;
        require_extent("edges.min_segment_width", edges.min_segment_width, 1)?;

        let pairing = &self.pairing;
        require_extent("pairing.min_body_width", pairing.min_body_width, 0)?;
        require_extent("pairing.min_spacing", pairing.min_spacing, 0)?;
        require(
            "pairing.max_gap_factor",
            pairing.max_gap_factor,
            (1..=limits::MAX_GAP_FACTOR).contains(&pairing.max_gap_factor),
        )?;

        let sampling = &self.sampling;
        require_extent("sampling.sample_width", sampling.sample_width, 1)?;
        require_extent("sampling.sample_offset", sampling.sample_offset, 0)?;
        require_extent("sampling.strip_height", sampling.strip_height, 1)?;

        require(
            "comparison.color_threshold",
            self.comparison.color_threshold,
            self.comparison.color_threshold.is_finite() && self.comparison.color_threshold >= 0.0,
        )?;

        Ok(())
    }
}

fn require<T: ToString>(parameter: &str, value: T, ok: bool) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(InspectionError::invalid_parameter(parameter, value))
    }
}

fn require_odd_kernel(parameter: &str, value: i32) -> Result<()> {
    require(parameter, value, (3..=limits::MAX_PIXEL_EXTENT).contains(&value) && value % 2 == 1)
}

fn require_extent(parameter: &str, value: i32, min: i32) -> Result<()> {
    require(parameter, value, (min..=limits::MAX_PIXEL_EXTENT).contains(&value))
}

fn require_iterations(parameter: &str, value: i32) -> Result<()> {
    require(parameter, value, (0..=limits::MAX_ITERATIONS).contains(&value))
}
