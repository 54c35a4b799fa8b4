//! Default tuning values for the wire detection pipeline
//!
//! These are the baseline values used by [`crate::PipelineConfig::default`].
//! Stages never read them directly; they receive a configuration value.

/// Connector segmentation
pub mod segmentation {
    /// Gaussian blur kernel size applied to the grayscale image (odd)
    pub const BLUR_KERNEL_SIZE: i32 = 7;

    /// Neighborhood size for Gaussian-weighted adaptive thresholding (odd)
    pub const ADAPTIVE_BLOCK_SIZE: i32 = 21;

    /// Constant subtracted from the weighted neighborhood mean
    pub const ADAPTIVE_OFFSET: f64 = 5.0;

    /// Square structuring element size for close/open
    pub const MORPH_KERNEL_SIZE: i32 = 7;

    /// Closing iterations (gap filling)
    pub const CLOSE_ITERATIONS: i32 = 2;

    /// Opening iterations (speckle removal)
    pub const OPEN_ITERATIONS: i32 = 1;

    /// Mean mask intensity separating foreground-dominant from background-dominant
    pub const POLARITY_THRESHOLD: f64 = 127.0;
}

/// Region-of-interest expansion around the connector bounding box
pub mod roi {
    /// Upward expansion as a multiple of the box height (wires leave the housing upward)
    pub const EXPAND_UP: f64 = 2.5;

    /// Downward expansion as a multiple of the box height
    pub const EXPAND_DOWN: f64 = 0.5;

    /// Left and right expansion as a multiple of the box width
    pub const EXPAND_HORIZONTAL: f64 = 0.3;
}

/// Edge scanning
pub mod edges {
    /// Canny hysteresis low threshold
    pub const CANNY_LOW_THRESHOLD: f64 = 30.0;

    /// Canny hysteresis high threshold
    pub const CANNY_HIGH_THRESHOLD: f64 = 90.0;

    /// Sobel aperture used by Canny
    pub const CANNY_APERTURE: i32 = 3;

    /// Row of the cropped image that is scanned for wire edges
    pub const SCAN_ROW: i32 = 200;

    /// Minimum run length of edge response counted as a segment
    pub const MIN_SEGMENT_WIDTH: i32 = 1;
}

/// Boundary pairing
pub mod pairing {
    /// A wire body must be strictly wider than this
    pub const MIN_BODY_WIDTH: i32 = 8;

    /// Buffer between the previous wire's right edge and the next left edge
    pub const MIN_SPACING: i32 = 2;

    /// Edge gap must stay below `MAX_GAP_FACTOR * MIN_BODY_WIDTH`
    pub const MAX_GAP_FACTOR: i32 = 3;
}

/// Color sampling
pub mod sampling {
    /// Horizontal width of the sampling window
    pub const SAMPLE_WIDTH: i32 = 7;

    /// Offset from the left edge used by the fallback window
    pub const SAMPLE_OFFSET: i32 = 3;

    /// Half-height of the sampling strip around the scan row
    pub const STRIP_HEIGHT: i32 = 7;
}

/// Sequence comparison
pub mod comparison {
    /// Maximum Euclidean BGR distance for two colors to be considered equal
    pub const COLOR_THRESHOLD: f64 = 50.0;
}

/// Upper bounds accepted by configuration validation
pub mod limits {
    /// Largest pixel extent (kernel size, window size, offset, row) a setting may take
    pub const MAX_PIXEL_EXTENT: i32 = 1 << 16;

    /// Largest pairing gap factor
    pub const MAX_GAP_FACTOR: i32 = 1 << 10;

    /// Largest morphology iteration count
    pub const MAX_ITERATIONS: i32 = 64;
}
