//! Asymmetric region-of-interest cropping around the connector
//!
//! Wires leave the housing upward, so the crop window reaches much further
//! above the housing than below or to the sides.

use log::{debug, warn};
use opencv::{
    core::{Mat, Rect},
    prelude::*,
};

use crate::config::RoiConfig;
use crate::detection::connector::largest_contour_bounds;
use crate::raster::{ConnectorMask, RasterImage};
use crate::{InspectionError, Result};

/// Cropped wire region
#[derive(Debug)]
pub struct RoiCrop {
    /// Cropped image
    pub image: RasterImage,
    /// Crop window in source image coordinates
    pub window: Rect,
    /// True when the expanded window collapsed and the whole image was used
    pub full_image_fallback: bool,
}

/// Derives the wire region from the connector mask
pub struct RoiCropper<'a> {
    config: &'a RoiConfig,
}

impl<'a> RoiCropper<'a> {
    pub fn new(config: &'a RoiConfig) -> Self {
        Self { config }
    }

    /// Crop the wire region out of `image`
    ///
    /// # Errors
    ///
    /// Returns `NoConnectorDetected` if the mask has no contour.
    pub fn crop(&self, mask: &ConnectorMask, image: &RasterImage) -> Result<RoiCrop> {
        let bounds = largest_contour_bounds(mask.as_mat())?.ok_or_else(|| {
            InspectionError::NoConnectorDetected {
                reason: "no contours in mask, cropping aborted".into(),
            }
        })?;
        debug!(
            "connector bounds x={} y={} w={} h={}",
            bounds.x, bounds.y, bounds.width, bounds.height
        );

        match expand_bounds(bounds, image.width(), image.height(), self.config) {
            Some(window) => {
                let cropped = Mat::roi(image.as_mat(), window)
                    .map_err(|e| InspectionError::opencv("ROI extraction", e))?
                    .try_clone()
                    .map_err(|e| InspectionError::opencv("ROI copy", e))?;
                Ok(RoiCrop {
                    image: RasterImage::from_mat(cropped)?,
                    window,
                    full_image_fallback: false,
                })
            }
            // Only negative expansions can collapse a window around a real contour
            None => {
                warn!("crop window collapsed, using full image");
                let full = image
                    .as_mat()
                    .try_clone()
                    .map_err(|e| InspectionError::opencv("Image copy", e))?;
                Ok(RoiCrop {
                    image: RasterImage::from_mat(full)?,
                    window: Rect::new(0, 0, image.width(), image.height()),
                    full_image_fallback: true,
                })
            }
        }
    }
}

/// Expand connector bounds into the crop window, clamped to the image
///
/// Returns `None` when the clamped window has no area.
pub fn expand_bounds(bounds: Rect, image_width: i32, image_height: i32, config: &RoiConfig) -> Option<Rect> {
    let (x, y) = (bounds.x as f64, bounds.y as f64);
    let (w, h) = (bounds.width as f64, bounds.height as f64);

    // `as i32` truncates toward zero before clamping
    let top = ((y - h * config.expand_up) as i32).max(0);
    let bottom = ((y + h + h * config.expand_down) as i32).min(image_height);
    let left = ((x - w * config.expand_horizontal) as i32).max(0);
    let right = ((x + w + w * config.expand_horizontal) as i32).min(image_width);

    let width = (right - left).min(image_width - left);
    let height = (bottom - top).min(image_height - top);

    if width <= 0 || height <= 0 {
        return None;
    }
    Some(Rect::new(left, top, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_bounds_asymmetric() {
        let config = RoiConfig::default();
        // Housing 100x40 at (200, 300) in a 640x480 image
        let window = expand_bounds(Rect::new(200, 300, 100, 40), 640, 480, &config).unwrap();

        // up 2.5*40 = 100, down 0.5*40 = 20, sides 0.3*100 = 30
        assert_eq!(window, Rect::new(170, 200, 160, 160));
    }

    #[test]
    fn test_expand_bounds_clamped_to_image() {
        let config = RoiConfig::default();
        let window = expand_bounds(Rect::new(10, 20, 100, 100), 150, 140, &config).unwrap();

        assert_eq!(window.x, 0);
        assert_eq!(window.y, 0);
        assert_eq!(window.x + window.width, 140);
        assert_eq!(window.y + window.height, 140);
    }

    #[test]
    fn test_expand_bounds_degenerate() {
        let config = RoiConfig {
            expand_up: 0.0,
            expand_down: 0.0,
            expand_horizontal: 0.0,
        };
        assert_eq!(expand_bounds(Rect::new(5, 5, 0, 10), 50, 50, &config), None);
        assert_eq!(expand_bounds(Rect::new(60, 5, 10, 10), 50, 50, &config), None);
    }

    #[test]
    fn test_crop_returns_window_pixels() {
        use opencv::core::{Scalar, CV_8UC1};
        use opencv::imgproc::{rectangle, FILLED, LINE_8};

        let image = RasterImage::filled(400, 300, [10, 20, 30]).unwrap();
        let mut mask = Mat::zeros(300, 400, CV_8UC1).unwrap().to_mat().unwrap();
        rectangle(&mut mask, Rect::new(150, 200, 100, 40), Scalar::all(255.0), FILLED, LINE_8, 0).unwrap();
        let mask = ConnectorMask::new(mask).unwrap();

        let config = RoiConfig::default();
        let crop = RoiCropper::new(&config).crop(&mask, &image).unwrap();

        assert!(!crop.full_image_fallback);
        assert_eq!(crop.window, Rect::new(120, 100, 160, 160));
        assert_eq!(crop.image.width(), 160);
        assert_eq!(crop.image.height(), 160);
        assert_eq!(crop.image.pixel(0, 0).unwrap(), [10, 20, 30]);
    }

    #[test]
    fn test_crop_without_contour_fails_recoverably() {
        use opencv::core::CV_8UC1;

        let image = RasterImage::filled(40, 40, [0, 0, 0]).unwrap();
        let mask = ConnectorMask::new(Mat::zeros(40, 40, CV_8UC1).unwrap().to_mat().unwrap()).unwrap();

        let config = RoiConfig::default();
        let err = RoiCropper::new(&config).crop(&mask, &image).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_collapsed_window_falls_back_to_full_image() {
        use opencv::core::{Scalar, CV_8UC1};
        use opencv::imgproc::{rectangle, FILLED, LINE_8};

        let image = RasterImage::filled(400, 300, [10, 20, 30]).unwrap();
        let mut mask = Mat::zeros(300, 400, CV_8UC1).unwrap().to_mat().unwrap();
        rectangle(&mut mask, Rect::new(150, 200, 100, 40), Scalar::all(255.0), FILLED, LINE_8, 0).unwrap();
        let mask = ConnectorMask::new(mask).unwrap();

        // Sides pulled in by the full housing width leave no columns
        let config = RoiConfig {
            expand_up: 0.0,
            expand_down: 0.0,
            expand_horizontal: -1.0,
        };
        let crop = RoiCropper::new(&config).crop(&mask, &image).unwrap();

        assert!(crop.full_image_fallback);
        assert_eq!(crop.window, Rect::new(0, 0, 400, 300));
        assert_eq!(crop.image.width(), 400);
        assert_eq!(crop.image.height(), 300);
        assert_eq!(crop.image.pixel(399, 299).unwrap(), [10, 20, 30]);
    }
}
