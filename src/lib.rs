//! # Wire Sequence
//!
//! A Rust crate for checking the wire color order of electrical connectors
//! from digital photographs.
//!
//! This library detects the wire sequence by:
//! - Segmenting the connector housing and cropping the wire region above it
//! - Scanning one horizontal row for wire edges
//! - Pairing edges into wire bodies, left to right
//! - Sampling the mean color inside each wire body
//!
//! and compares the detected sequence against an expected one, wire by wire.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wire_sequence::{detect_sequence, image_loader::load_image, Bgr, ExpectedSequence, Inspector, InspectionMode};
//! use std::path::Path;
//!
//! let image = load_image(Path::new("connector.jpg"))?;
//! let sequence = detect_sequence(&image)?;
//! println!("{} wires: {:?}", sequence.count(), sequence.colors());
//!
//! let expected = ExpectedSequence::from_colors(vec![Bgr::new(0, 0, 255), Bgr::new(255, 0, 0)]);
//! let result = Inspector::new().inspect(InspectionMode::SingleSided, &[image], &[expected])?;
//! println!("match: {}\n{}", result.matched, result.details);
//! # Ok::<(), wire_sequence::InspectionError>(())
//! ```

pub mod error;
pub mod constants;
pub mod config;
pub mod raster;
pub mod image_loader;
pub mod detection;
pub mod color;
pub mod sequence;
pub mod inspection;

pub use color::{Bgr, ColorConverter};
pub use config::PipelineConfig;
pub use error::{InspectionError, Result};
pub use inspection::{InspectionMode, Inspector};
pub use raster::{ConnectorMask, RasterImage};
pub use sequence::{
    ComparisonResult, ExpectedSequence, Finding, SequenceBuilder, SequenceComparator, SequenceDetection, Side,
    SideReport, WireSequence,
};

/// Detect the wire sequence of one image with default tuning
///
/// A connector that cannot be found, or a wire region without edges, yields
/// an empty sequence rather than an error.
///
/// # Errors
///
/// Returns `OpenCvError` if an image operation fails.
pub fn detect_sequence(image: &RasterImage) -> Result<WireSequence> {
    detect_sequence_with_config(image, &PipelineConfig::default())
}

/// Detect the wire sequence of one image with custom tuning
///
/// # Errors
///
/// Returns `InvalidParameter` if `config` fails validation, and
/// `OpenCvError` if an image operation fails.
pub fn detect_sequence_with_config(image: &RasterImage, config: &PipelineConfig) -> Result<WireSequence> {
    config.validate()?;
    SequenceBuilder::new(config).build(image)
}
