//! Wire color sampling and color utilities
//!
//! This module handles sampling representative colors from wire bodies and
//! the color triplet type shared by detection and comparison.

pub mod conversion;
pub mod sampler;

pub use conversion::{Bgr, ColorConverter};
pub use sampler::{ColorSampler, SampleWindow};
