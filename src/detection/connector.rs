//! Connector housing segmentation with polarity correction
//!
//! Produces a binary mask in which the connector housing is foreground:
//! - Grayscale conversion and Gaussian blur
//! - Gaussian-weighted adaptive thresholding
//! - Morphological close then open
//! - Two polarity checks: whole-mask brightness, then brightness inside the
//!   largest contour

use log::debug;
use opencv::{
    core::{bitwise_not, mean, Mat, Point, Scalar, Size, Vector, BORDER_CONSTANT, BORDER_DEFAULT, CV_8UC1},
    imgproc::{
        adaptive_threshold, bounding_rect, contour_area, cvt_color, draw_contours, find_contours,
        gaussian_blur, get_structuring_element, morphology_default_border_value, morphology_ex,
        ADAPTIVE_THRESH_GAUSSIAN_C, CHAIN_APPROX_SIMPLE, COLOR_BGR2GRAY, FILLED, LINE_8,
        MORPH_CLOSE, MORPH_OPEN, MORPH_RECT, RETR_EXTERNAL, THRESH_BINARY, THRESH_BINARY_INV,
    },
    prelude::*,
};

use crate::config::SegmentationConfig;
use crate::raster::{ConnectorMask, RasterImage};
use crate::{InspectionError, Result};

pub(crate) type VectorOfPoint = Vector<Point>;

/// Housing mask plus the polarity corrections applied to it
#[derive(Debug)]
pub struct Segmentation {
    pub mask: ConnectorMask,
    /// The first threshold pass was mostly foreground and was redone inverted
    pub rethresholded_inverted: bool,
    /// The largest contour enclosed mostly background and the mask was inverted
    pub mask_inverted: bool,
}

/// Segments the connector housing from a BGR image
pub struct ConnectorSegmenter<'a> {
    config: &'a SegmentationConfig,
}

impl<'a> ConnectorSegmenter<'a> {
    pub fn new(config: &'a SegmentationConfig) -> Self {
        Self { config }
    }

    /// Segment the connector housing
    ///
    /// # Errors
    ///
    /// Returns `NoConnectorDetected` if the cleaned mask has no external
    /// contour, and `OpenCvError` if an OpenCV call fails.
    pub fn segment(&self, image: &RasterImage) -> Result<ConnectorMask> {
        self.segment_detailed(image).map(|segmentation| segmentation.mask)
    }

    /// Segment the connector housing and report which polarity corrections ran
    pub fn segment_detailed(&self, image: &RasterImage) -> Result<Segmentation> {
        let blurred = self.preprocess(image)?;

        let mut mask = self.threshold_and_clean(&blurred, THRESH_BINARY)?;
        let mask_mean = mean_value(&mask, &Mat::default())?;
        let rethresholded_inverted = mask_mean > self.config.polarity_threshold;
        if rethresholded_inverted {
            debug!("mask mean {:.1} above polarity threshold, re-thresholding inverted", mask_mean);
            mask = self.threshold_and_clean(&blurred, THRESH_BINARY_INV)?;
        }

        let (mask, mask_inverted) = self.orient_mask(mask)?;
        Ok(Segmentation {
            mask: ConnectorMask::new(mask)?,
            rethresholded_inverted,
            mask_inverted,
        })
    }

    /// Invert `mask` if its largest external contour encloses mostly background
    fn orient_mask(&self, mask: Mat) -> Result<(Mat, bool)> {
        let contours = external_contours(&mask)?;
        let Some(largest) = largest_contour_index(&contours)? else {
            return Err(InspectionError::NoConnectorDetected {
                reason: "no contours in connector mask".into(),
            });
        };

        let inside = filled_contour_mask(&mask, &contours, largest)?;
        let inside_mean = mean_value(&mask, &inside)?;
        if inside_mean >= self.config.polarity_threshold {
            return Ok((mask, false));
        }

        debug!("largest contour is dark (mean {:.1}), inverting mask", inside_mean);
        let mut inverted = Mat::default();
        bitwise_not(&mask, &mut inverted, &Mat::default())
            .map_err(|e| InspectionError::opencv("Mask inversion", e))?;
        Ok((inverted, true))
    }

    /// Grayscale conversion and blur
    fn preprocess(&self, image: &RasterImage) -> Result<Mat> {
        let mut gray = Mat::default();
        cvt_color(
            image.as_mat(),
            &mut gray,
            COLOR_BGR2GRAY,
            0,
            opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(|e| InspectionError::opencv("Grayscale conversion", e))?;

        let k = self.config.blur_kernel_size;
        let mut blurred = Mat::default();
        gaussian_blur(
            &gray,
            &mut blurred,
            Size::new(k, k),
            0.0,
            0.0,
            BORDER_DEFAULT,
            opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(|e| InspectionError::opencv("Gaussian blur", e))?;

        Ok(blurred)
    }

    /// Adaptive threshold followed by close and open
    fn threshold_and_clean(&self, blurred: &Mat, threshold_type: i32) -> Result<Mat> {
        let mut binary = Mat::default();
        adaptive_threshold(
            blurred,
            &mut binary,
            255.0,
            ADAPTIVE_THRESH_GAUSSIAN_C,
            threshold_type,
            self.config.adaptive_block_size,
            self.config.adaptive_offset,
        )
        .map_err(|e| InspectionError::opencv("Adaptive threshold", e))?;

        let k = self.config.morph_kernel_size;
        let kernel = get_structuring_element(MORPH_RECT, Size::new(k, k), Point::new(-1, -1))
            .map_err(|e| InspectionError::opencv("Kernel creation", e))?;
        let border_value = morphology_default_border_value()
            .map_err(|e| InspectionError::opencv("Morphology border value", e))?;

        let mut closed = Mat::default();
        morphology_ex(
            &binary,
            &mut closed,
            MORPH_CLOSE,
            &kernel,
            Point::new(-1, -1),
            self.config.close_iterations,
            BORDER_CONSTANT,
            border_value,
        )
        .map_err(|e| InspectionError::opencv("Closing", e))?;

        let mut opened = Mat::default();
        morphology_ex(
            &closed,
            &mut opened,
            MORPH_OPEN,
            &kernel,
            Point::new(-1, -1),
            self.config.open_iterations,
            BORDER_CONSTANT,
            border_value,
        )
        .map_err(|e| InspectionError::opencv("Opening", e))?;

        Ok(opened)
    }
}

/// External contours of a binary mask
pub(crate) fn external_contours(mask: &Mat) -> Result<Vector<VectorOfPoint>> {
    let mut contours = Vector::<VectorOfPoint>::new();
    find_contours(
        mask,
        &mut contours,
        RETR_EXTERNAL,
        CHAIN_APPROX_SIMPLE,
        Point::new(0, 0),
    )
    .map_err(|e| InspectionError::opencv("Contour detection", e))?;
    Ok(contours)
}

/// Index of the maximum-area contour; the first one wins on ties
pub(crate) fn largest_contour_index(contours: &Vector<VectorOfPoint>) -> Result<Option<usize>> {
    let mut best: Option<(usize, f64)> = None;
    for (i, contour) in contours.iter().enumerate() {
        let area = contour_area(&contour, false)
            .map_err(|e| InspectionError::opencv("Area calculation", e))?;
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((i, area)),
        }
    }
    Ok(best.map(|(i, _)| i))
}

/// Bounding rectangle of the largest external contour of `mask`
pub(crate) fn largest_contour_bounds(mask: &Mat) -> Result<Option<opencv::core::Rect>> {
    let contours = external_contours(mask)?;
    let Some(index) = largest_contour_index(&contours)? else {
        return Ok(None);
    };
    let contour = contours
        .get(index)
        .map_err(|e| InspectionError::opencv("Contour access", e))?;
    let rect = bounding_rect(&contour).map_err(|e| InspectionError::opencv("Bounding rect", e))?;
    Ok(Some(rect))
}

fn filled_contour_mask(like: &Mat, contours: &Vector<VectorOfPoint>, index: usize) -> Result<Mat> {
    let mut filled = Mat::zeros(like.rows(), like.cols(), CV_8UC1)
        .map_err(|e| InspectionError::opencv("Mask creation", e))?
        .to_mat()
        .map_err(|e| InspectionError::opencv("Mask conversion", e))?;
    draw_contours(
        &mut filled,
        contours,
        index as i32,
        Scalar::all(255.0),
        FILLED,
        LINE_8,
        &Mat::default(),
        i32::MAX,
        Point::new(0, 0),
    )
    .map_err(|e| InspectionError::opencv("Contour drawing", e))?;
    Ok(filled)
}

fn mean_value(src: &Mat, mask: &Mat) -> Result<f64> {
    let m = mean(src, mask).map_err(|e| InspectionError::opencv("Mean computation", e))?;
    Ok(m[0])
}
