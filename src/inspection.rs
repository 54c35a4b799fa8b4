//! Inspection modes and per-request orchestration
//!
//! A single-sided connector is inspected from one image, a dual-sided one
//! from a front and a back image. Sides run one after another with no state
//! shared between them.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::config::PipelineConfig;
use crate::raster::RasterImage;
use crate::sequence::{ComparisonResult, ExpectedSequence, SequenceBuilder, SequenceComparator, WireSequence};
use crate::{InspectionError, Result};

/// Number of connector sides inspected per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionMode {
    SingleSided,
    DualSided,
}

impl InspectionMode {
    /// Images (and expectations) one request carries
    pub fn side_count(&self) -> usize {
        match self {
            InspectionMode::SingleSided => 1,
            InspectionMode::DualSided => 2,
        }
    }
}

impl FromStr for InspectionMode {
    type Err = InspectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "singlewire" | "single" => Ok(InspectionMode::SingleSided),
            "doublewire" | "double" | "dual" => Ok(InspectionMode::DualSided),
            _ => Err(InspectionError::InvalidMode { mode: s.to_string() }),
        }
    }
}

impl fmt::Display for InspectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionMode::SingleSided => f.write_str("singlewire"),
            InspectionMode::DualSided => f.write_str("doublewire"),
        }
    }
}

/// Runs detection and comparison for whole inspection requests
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    config: PipelineConfig,
}

impl Inspector {
    /// Inspector with default tuning
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspector with custom tuning
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `config` fails validation.
    pub fn with_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Detect one wire sequence per side, in image order
    ///
    /// # Errors
    ///
    /// `InvalidMode` if the number of images does not fit `mode`; any
    /// non-recoverable pipeline fault.
    pub fn detect(&self, mode: InspectionMode, images: &[RasterImage]) -> Result<Vec<WireSequence>> {
        check_count(mode, images.len(), "images")?;

        let builder = SequenceBuilder::new(&self.config);
        images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                let sequence = builder.build(image)?;
                debug!("{} side {}: {} wires", mode, i + 1, sequence.count());
                Ok(sequence)
            })
            .collect()
    }

    /// Detect and compare against `expected`, one expectation per side
    pub fn inspect(
        &self,
        mode: InspectionMode,
        images: &[RasterImage],
        expected: &[ExpectedSequence],
    ) -> Result<ComparisonResult> {
        check_count(mode, expected.len(), "expected sequences")?;
        let detected = self.detect(mode, images)?;
        Ok(self.compare(mode, expected, &detected))
    }

    /// Compare already detected sequences; slices must be sized for `mode`
    fn compare(
        &self,
        mode: InspectionMode,
        expected: &[ExpectedSequence],
        detected: &[WireSequence],
    ) -> ComparisonResult {
        let comparator = SequenceComparator::new(&self.config.comparison);
        match mode {
            InspectionMode::SingleSided => comparator.compare_single(&expected[0], &detected[0]),
            InspectionMode::DualSided => {
                comparator.compare_dual((&expected[0], &detected[0]), (&expected[1], &detected[1]))
            }
        }
    }
}

fn check_count(mode: InspectionMode, got: usize, what: &str) -> Result<()> {
    if got != mode.side_count() {
        return Err(InspectionError::InvalidMode {
            mode: format!("{} with {} {}", mode, got, what),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("singlewire".parse::<InspectionMode>().unwrap(), InspectionMode::SingleSided);
        assert_eq!("single".parse::<InspectionMode>().unwrap(), InspectionMode::SingleSided);
        assert_eq!("doublewire".parse::<InspectionMode>().unwrap(), InspectionMode::DualSided);
        assert_eq!("Dual".parse::<InspectionMode>().unwrap(), InspectionMode::DualSided);

        let err = "triplewire".parse::<InspectionMode>().unwrap_err();
        assert!(matches!(err, InspectionError::InvalidMode { .. }));
    }

    #[test]
    fn test_mode_display_roundtrip() {
        for mode in [InspectionMode::SingleSided, InspectionMode::DualSided] {
            assert_eq!(mode.to_string().parse::<InspectionMode>().unwrap(), mode);
        }
        assert_eq!(InspectionMode::SingleSided.side_count(), 1);
        assert_eq!(InspectionMode::DualSided.side_count(), 2);
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = PipelineConfig::default();
        config.pairing.max_gap_factor = 1_000_000_000;

        match Inspector::with_config(config) {
            Err(InspectionError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, "pairing.max_gap_factor");
            }
            other => panic!("Expected InvalidParameter, got: {:?}", other),
        }

        let inspector = Inspector::with_config(PipelineConfig::default()).unwrap();
        assert_eq!(inspector.config(), &PipelineConfig::default());
    }

    #[test]
    fn test_wrong_image_count_is_invalid_mode() {
        let inspector = Inspector::new();
        let image = RasterImage::filled(32, 32, [0, 0, 0]).unwrap();

        let err = inspector.detect(InspectionMode::DualSided, &[image]).unwrap_err();
        assert!(matches!(err, InspectionError::InvalidMode { .. }));

        let err = inspector.detect(InspectionMode::SingleSided, &[]).unwrap_err();
        assert!(matches!(err, InspectionError::InvalidMode { .. }));
    }

    #[test]
    fn test_wrong_expectation_count_is_invalid_mode() {
        let inspector = Inspector::new();
        let image = RasterImage::filled(32, 32, [0, 0, 0]).unwrap();

        let err = inspector
            .inspect(InspectionMode::SingleSided, &[image], &[ExpectedSequence::empty(), ExpectedSequence::empty()])
            .unwrap_err();
        assert!(matches!(err, InspectionError::InvalidMode { .. }));
    }

    #[test]
    fn test_blank_images_match_empty_expectations() {
        let inspector = Inspector::new();
        let front = RasterImage::filled(120, 90, [255, 255, 255]).unwrap();
        let back = RasterImage::filled(120, 90, [255, 255, 255]).unwrap();

        let result = inspector
            .inspect(
                InspectionMode::DualSided,
                &[front, back],
                &[ExpectedSequence::empty(), ExpectedSequence::empty()],
            )
            .unwrap();

        assert!(result.matched);
        assert_eq!(result.sides.len(), 2);
    }
}
