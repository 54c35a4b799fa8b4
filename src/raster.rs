//! Pixel buffers passed between pipeline stages
//!
//! [`RasterImage`] is the decoded input: 8-bit, 3-channel, BGR channel
//! order, never empty. [`ConnectorMask`] is the binary segmentation of the
//! connector housing (255 = housing).

use opencv::{
    core::{Mat, Rect, Scalar, CV_8UC1, CV_8UC3},
    imgproc::{rectangle, FILLED, LINE_8},
    prelude::*,
};

use crate::{InspectionError, Result};

/// Decoded BGR image owned by one pipeline invocation
#[derive(Debug)]
pub struct RasterImage {
    mat: Mat,
}

impl RasterImage {
    /// Wrap an existing OpenCV matrix
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the matrix is empty or not `CV_8UC3`.
    pub fn from_mat(mat: Mat) -> Result<Self> {
        if mat.empty() {
            return Err(InspectionError::invalid_parameter("image", "empty"));
        }
        if mat.typ() != CV_8UC3 {
            return Err(InspectionError::invalid_parameter(
                "image.type",
                format!("{} (expected CV_8UC3)", mat.typ()),
            ));
        }
        Ok(Self { mat })
    }

    /// Build an image from an interleaved BGR byte buffer
    pub fn from_bgr_bytes(width: i32, height: i32, data: &[u8]) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(InspectionError::invalid_parameter(
                "image.size",
                format!("{}x{}", width, height),
            ));
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(InspectionError::invalid_parameter(
                "image.data.len",
                format!("{} (expected {})", data.len(), expected),
            ));
        }

        let mut mat = Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(0.0))
            .map_err(|e| InspectionError::opencv("Mat allocation", e))?;
        mat.data_bytes_mut()
            .map_err(|e| InspectionError::opencv("Mat data access", e))?
            .copy_from_slice(data);

        Self::from_mat(mat)
    }

    /// Build an image from an RGB image, swapping into BGR order
    pub fn from_rgb_image(rgb: &image::RgbImage) -> Result<Self> {
        let (width, height) = rgb.dimensions();
        let bgr: Vec<u8> = rgb
            .pixels()
            .flat_map(|p| [p.0[2], p.0[1], p.0[0]])
            .collect();
        Self::from_bgr_bytes(width as i32, height as i32, &bgr)
    }

    /// Create an image filled with one BGR color
    pub fn filled(width: i32, height: i32, bgr: [u8; 3]) -> Result<Self> {
        let mat = Mat::new_rows_cols_with_default(height, width, CV_8UC3, bgr_scalar(bgr))
            .map_err(|e| InspectionError::opencv("Mat allocation", e))?;
        Self::from_mat(mat)
    }

    /// Image width in pixels
    pub fn width(&self) -> i32 {
        self.mat.cols()
    }

    /// Image height in pixels
    pub fn height(&self) -> i32 {
        self.mat.rows()
    }

    /// Borrow the underlying matrix
    pub fn as_mat(&self) -> &Mat {
        &self.mat
    }

    /// Consume the image and return it with `rect` filled in one BGR color
    ///
    /// Parts of `rect` outside the image are clipped.
    pub fn with_filled_rect(mut self, rect: Rect, bgr: [u8; 3]) -> Result<Self> {
        rectangle(&mut self.mat, rect, bgr_scalar(bgr), FILLED, LINE_8, 0)
            .map_err(|e| InspectionError::opencv("Rectangle drawing", e))?;
        Ok(self)
    }

    /// BGR value at `(x, y)`
    pub fn pixel(&self, x: i32, y: i32) -> Result<[u8; 3]> {
        let px = self
            .mat
            .at_2d::<opencv::core::Vec3b>(y, x)
            .map_err(|e| InspectionError::opencv("Pixel access", e))?;
        Ok([px[0], px[1], px[2]])
    }
}

fn bgr_scalar(bgr: [u8; 3]) -> Scalar {
    Scalar::new(bgr[0] as f64, bgr[1] as f64, bgr[2] as f64, 0.0)
}

/// Binary connector mask, same size as its source image
#[derive(Debug)]
pub struct ConnectorMask {
    mat: Mat,
}

impl ConnectorMask {
    pub(crate) fn new(mat: Mat) -> Result<Self> {
        if mat.typ() != CV_8UC1 {
            return Err(InspectionError::invalid_parameter(
                "mask.type",
                format!("{} (expected CV_8UC1)", mat.typ()),
            ));
        }
        Ok(Self { mat })
    }

    pub fn width(&self) -> i32 {
        self.mat.cols()
    }

    pub fn height(&self) -> i32 {
        self.mat.rows()
    }

    pub fn as_mat(&self) -> &Mat {
        &self.mat
    }
}
