//! Connector and wire boundary detection module
//!
//! This module handles segmenting the connector housing, cropping the wire
//! region above it, and locating wire bodies along the scan row.

pub mod connector;
pub mod edges;
pub mod pairing;
pub mod roi;

pub use connector::{ConnectorSegmenter, Segmentation};
pub use edges::{EdgeSegment, ScanLine, WireBoundaryDetector};
pub use pairing::{WireBody, WirePairing};
pub use roi::{RoiCrop, RoiCropper};
