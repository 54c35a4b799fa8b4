//! Color triplets and conversions
//!
//! Colors travel through the pipeline in OpenCV's BGR channel order. This
//! module provides:
//! - The [`Bgr`] triplet with Euclidean distance
//! - Conversion to and from `palette` sRGB
//! - Hex color representation for diagnostics and expected-sequence files

use std::fmt;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::{InspectionError, Result};

/// 8-bit color triplet in (blue, green, red) order
///
/// Serializes as a `[b, g, r]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Bgr {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

impl Bgr {
    pub const fn new(blue: u8, green: u8, red: u8) -> Self {
        Self { blue, green, red }
    }

    /// Euclidean distance in BGR space
    pub fn distance(&self, other: &Bgr) -> f64 {
        let db = self.blue as f64 - other.blue as f64;
        let dg = self.green as f64 - other.green as f64;
        let dr = self.red as f64 - other.red as f64;
        (db * db + dg * dg + dr * dr).sqrt()
    }
}

impl From<[u8; 3]> for Bgr {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Bgr> for [u8; 3] {
    fn from(c: Bgr) -> Self {
        [c.blue, c.green, c.red]
    }
}

impl From<Srgb<u8>> for Bgr {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.blue, c.green, c.red)
    }
}

impl From<Bgr> for Srgb<u8> {
    fn from(c: Bgr) -> Self {
        Srgb::new(c.red, c.green, c.blue)
    }
}

impl fmt::Display for Bgr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.blue, self.green, self.red)
    }
}

/// Color converter for display and input formats
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Hexadecimal representation in RGB order (e.g., "#FF0000" for pure red)
    pub fn bgr_to_hex(&self, bgr: Bgr) -> String {
        format!("#{:02X}{:02X}{:02X}", bgr.red, bgr.green, bgr.blue)
    }

    /// Parse a hexadecimal RGB color ("#FF0000" or "FF0000")
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the string is not six hex digits.
    pub fn hex_to_bgr(&self, hex: &str) -> Result<Bgr> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 {
            return Err(InspectionError::invalid_parameter("hex color", hex));
        }
        let srgb: Srgb<u8> = digits
            .parse()
            .map_err(|_| InspectionError::invalid_parameter("hex color", hex))?;
        Ok(Bgr::from(srgb))
    }
}
