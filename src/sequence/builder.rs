//! Per-image wire sequence detection
//!
//! Chains segmentation, cropping, edge scanning, pairing and sampling. Any
//! stage that finds nothing short-circuits to an empty sequence; only
//! genuine faults (OpenCV failures) are returned as errors.

use log::{debug, warn};
use opencv::core::Rect;
use serde::Serialize;

use crate::color::{Bgr, ColorSampler};
use crate::config::PipelineConfig;
use crate::detection::{ConnectorSegmenter, EdgeSegment, RoiCropper, WireBody, WireBoundaryDetector, WirePairing};
use crate::raster::RasterImage;
use crate::Result;

/// Ordered wire colors detected in one image, left to right
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WireSequence {
    count: usize,
    colors: Vec<Bgr>,
}

impl WireSequence {
    /// Sequence with no wires
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sequence whose count is the number of colors
    pub fn from_colors(colors: Vec<Bgr>) -> Self {
        Self {
            count: colors.len(),
            colors,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn colors(&self) -> &[Bgr] {
        &self.colors
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Intermediate results of one detection run
#[derive(Debug, Clone, Default)]
pub struct SequenceDetection {
    /// Crop window in source coordinates, if a connector was found
    pub crop_window: Option<Rect>,
    /// True when the crop fell back to the full image
    pub full_image_fallback: bool,
    /// Scan row in crop coordinates
    pub scan_row: Option<i32>,
    pub segments: Vec<EdgeSegment>,
    pub bodies: Vec<WireBody>,
    pub sequence: WireSequence,
}

/// Runs the detection pipeline on one image
pub struct SequenceBuilder<'a> {
    config: &'a PipelineConfig,
}

impl<'a> SequenceBuilder<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Detect the wire sequence of `image`
    pub fn build(&self, image: &RasterImage) -> Result<WireSequence> {
        Ok(self.build_detailed(image)?.sequence)
    }

    /// Detect the wire sequence, keeping every intermediate result
    pub fn build_detailed(&self, image: &RasterImage) -> Result<SequenceDetection> {
        let mut detection = SequenceDetection::default();
        match self.run(image, &mut detection) {
            Ok(()) => Ok(detection),
            Err(e) if e.is_recoverable() => {
                warn!("{}, reporting no wires", e);
                Ok(SequenceDetection {
                    sequence: WireSequence::empty(),
                    ..detection
                })
            }
            Err(e) => Err(e),
        }
    }

    fn run(&self, image: &RasterImage, detection: &mut SequenceDetection) -> Result<()> {
        let mask = ConnectorSegmenter::new(&self.config.segmentation).segment(image)?;

        let crop = RoiCropper::new(&self.config.roi).crop(&mask, image)?;
        detection.crop_window = Some(crop.window);
        detection.full_image_fallback = crop.full_image_fallback;

        let scan = WireBoundaryDetector::new(&self.config.edges).detect(&crop.image)?;
        detection.scan_row = Some(scan.row);
        detection.segments = scan.segments;

        detection.bodies = WirePairing::new(&self.config.pairing).pair(&detection.segments);
        debug!(
            "{} segments paired into {} wire bodies",
            detection.segments.len(),
            detection.bodies.len()
        );

        let colors = ColorSampler::new(&self.config.sampling).sample_all(&crop.image, &detection.bodies, scan.row)?;
        detection.sequence = WireSequence::from_colors(colors);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_colors_keeps_count_in_lockstep() {
        let seq = WireSequence::from_colors(vec![Bgr::new(0, 0, 255), Bgr::new(0, 255, 0)]);
        assert_eq!(seq.count(), 2);
        assert_eq!(seq.colors().len(), 2);
        assert!(!seq.is_empty());

        let empty = WireSequence::empty();
        assert_eq!(empty.count(), 0);
        assert!(empty.colors().is_empty());
    }

    #[test]
    fn test_serialization() {
        let seq = WireSequence::from_colors(vec![Bgr::new(1, 2, 3)]);
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, r#"{"count":1,"colors":[[1,2,3]]}"#);
    }

    #[test]
    fn test_blank_image_yields_empty_sequence() {
        let config = PipelineConfig::default();
        let image = RasterImage::filled(200, 150, [200, 200, 200]).unwrap();

        let detection = SequenceBuilder::new(&config).build_detailed(&image).unwrap();

        assert!(detection.sequence.is_empty());
        assert!(detection.crop_window.is_none());
        assert!(detection.bodies.is_empty());
    }
}
