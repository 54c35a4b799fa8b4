//! Wire boundary extraction along a single scan row
//!
//! Runs Canny on the cropped wire region and turns each maximal run of edge
//! response on the scan row into an [`EdgeSegment`].

use log::debug;
use opencv::{
    core::Mat,
    imgproc::{canny, cvt_color, COLOR_BGR2GRAY},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::config::EdgeScanConfig;
use crate::raster::RasterImage;
use crate::{InspectionError, Result};

/// Inclusive horizontal run of edge pixels on the scan row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSegment {
    pub start_x: i32,
    pub end_x: i32,
}

impl EdgeSegment {
    pub fn new(start_x: i32, end_x: i32) -> Self {
        Self { start_x, end_x }
    }

    /// Run length in pixels
    pub fn width(&self) -> i32 {
        self.end_x - self.start_x + 1
    }
}

/// Edge segments found on one scan row
#[derive(Debug, Clone)]
pub struct ScanLine {
    /// Row actually scanned, after clamping into the image
    pub row: i32,
    /// Segments sorted ascending by `start_x`, non-overlapping
    pub segments: Vec<EdgeSegment>,
}

/// Extracts candidate wire edges from the cropped region
pub struct WireBoundaryDetector<'a> {
    config: &'a EdgeScanConfig,
}

impl<'a> WireBoundaryDetector<'a> {
    pub fn new(config: &'a EdgeScanConfig) -> Self {
        Self { config }
    }

    /// Scan row clamped into `[0, height - 1]`
    pub fn scan_row(&self, image_height: i32) -> i32 {
        self.config.scan_row.clamp(0, (image_height - 1).max(0))
    }

    /// Detect edge segments on the scan row of `image`
    pub fn detect(&self, image: &RasterImage) -> Result<ScanLine> {
        let mut gray = Mat::default();
        cvt_color(
            image.as_mat(),
            &mut gray,
            COLOR_BGR2GRAY,
            0,
            opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(|e| InspectionError::opencv("Grayscale conversion", e))?;

        let mut edges = Mat::default();
        canny(
            &gray,
            &mut edges,
            self.config.canny_low_threshold,
            self.config.canny_high_threshold,
            self.config.canny_aperture,
            false,
        )
        .map_err(|e| InspectionError::opencv("Canny edge detection", e))?;

        let row = self.scan_row(image.height());
        let response = edges
            .at_row::<u8>(row)
            .map_err(|e| InspectionError::opencv("Edge row access", e))?;

        let segments = segments_from_row(response, self.config.min_segment_width);
        debug!("scan row {}: {} edge segments", row, segments.len());

        Ok(ScanLine { row, segments })
    }
}

/// Split one row of edge response into maximal nonzero runs
///
/// Runs shorter than `min_width` are dropped. The result is ascending and
/// non-overlapping by construction.
pub fn segments_from_row(response: &[u8], min_width: i32) -> Vec<EdgeSegment> {
    let mut segments = Vec::new();
    let mut run_start: Option<i32> = None;

    for (x, &value) in response.iter().enumerate() {
        let x = x as i32;
        match (value > 0, run_start) {
            (true, None) => run_start = Some(x),
            (false, Some(start)) => {
                push_run(&mut segments, start, x - 1, min_width);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        push_run(&mut segments, start, response.len() as i32 - 1, min_width);
    }

    segments
}

fn push_run(segments: &mut Vec<EdgeSegment>, start: i32, end: i32, min_width: i32) {
    let segment = EdgeSegment::new(start, end);
    if segment.width() >= min_width {
        segments.push(segment);
    }
}
