//! Wire color sampling
//!
//! Averages a small window inside each wire body, centered on the scan row.
//! Wires whose window collapses are skipped so the color list stays in
//! lockstep with the wire count.

use log::{debug, warn};
use opencv::{
    core::{mean, Mat, Rect},
    prelude::*,
};

use crate::color::Bgr;
use crate::config::SamplingConfig;
use crate::detection::WireBody;
use crate::raster::RasterImage;
use crate::{InspectionError, Result};

/// Inclusive pixel rectangle to average
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
}

impl SampleWindow {
    fn to_rect(self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1 - self.x0 + 1, self.y1 - self.y0 + 1)
    }
}

/// Samples the color of each wire body
pub struct ColorSampler<'a> {
    config: &'a SamplingConfig,
}

impl<'a> ColorSampler<'a> {
    pub fn new(config: &'a SamplingConfig) -> Self {
        Self { config }
    }

    /// Sampling window for `body` on `scan_row`, or `DegenerateRegion`
    pub fn window(&self, body: &WireBody, scan_row: i32, width: i32, height: i32) -> Result<SampleWindow> {
        let half = self.config.sample_width / 2;

        let mut x0 = body.left.end_x.saturating_add(1).max(body.center_x.saturating_sub(half));
        let mut x1 = body.right.start_x.saturating_sub(1).min(body.center_x.saturating_add(half));

        if x0 > x1 {
            x0 = body.left.end_x.saturating_add(self.config.sample_offset);
            x1 = x0.saturating_add(self.config.sample_width).min(width - 1);
            if x0 > x1 {
                return Err(InspectionError::DegenerateRegion {
                    reason: format!("no sample span for wire centered at x={}", body.center_x),
                });
            }
        }

        let x0 = x0.max(0);
        let x1 = x1.min(width - 1);
        let y0 = scan_row.saturating_sub(self.config.strip_height).max(0);
        let y1 = scan_row.saturating_add(self.config.strip_height).min(height - 1);

        if y0 >= y1 || x0 >= x1 {
            return Err(InspectionError::DegenerateRegion {
                reason: format!("sample window [{x0}, {x1}] x [{y0}, {y1}] has no area"),
            });
        }

        Ok(SampleWindow { x0, x1, y0, y1 })
    }

    /// Mean color inside `window`, rounded per channel
    pub fn average(&self, image: &RasterImage, window: SampleWindow) -> Result<Bgr> {
        let region = Mat::roi(image.as_mat(), window.to_rect())
            .map_err(|e| InspectionError::opencv("Sample region extraction", e))?
            .try_clone()
            .map_err(|e| InspectionError::opencv("Sample region copy", e))?;
        let m = mean(&region, &Mat::default())
            .map_err(|e| InspectionError::opencv("Sample mean", e))?;

        Ok(Bgr::new(to_channel(m[0]), to_channel(m[1]), to_channel(m[2])))
    }

    /// Sample every wire body, skipping degenerate ones
    ///
    /// The result keeps the order of `bodies`.
    pub fn sample_all(&self, image: &RasterImage, bodies: &[WireBody], scan_row: i32) -> Result<Vec<Bgr>> {
        let mut colors = Vec::with_capacity(bodies.len());
        for body in bodies {
            let window = match self.window(body, scan_row, image.width(), image.height()) {
                Ok(window) => window,
                Err(e) if e.is_recoverable() => {
                    warn!("skipping wire: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            let color = self.average(image, window)?;
            debug!("wire at x={} sampled {}", body.center_x, color);
            colors.push(color);
        }
        Ok(colors)
    }
}

fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
