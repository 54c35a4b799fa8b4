//! Image file loading
//!
//! Decodes the common raster formats with the `image` crate and hands the
//! pipeline a BGR [`RasterImage`]. Alpha is dropped; 16-bit and float
//! images are reduced to 8 bits per channel.

use std::path::Path;

use image::{DynamicImage, ImageReader};
use log::debug;

use crate::raster::RasterImage;
use crate::{InspectionError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    /// First frame only
    Gif,
    WebP,
    Tiff,
    Bmp,
    Tga,
    /// PBM, PGM, PPM
    Pnm,
    Qoi,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "tga" => Some(ImageFormat::Tga),
            "pbm" | "pgm" | "ppm" | "pnm" => Some(ImageFormat::Pnm),
            "qoi" => Some(ImageFormat::Qoi),
            _ => None,
        }
    }
}

/// Load an image from disk as BGR
///
/// # Errors
///
/// Returns `ImageLoadError` if the extension is unknown or the file cannot
/// be opened or decoded.
///
/// # Example
///
/// ```rust,no_run
/// use wire_sequence::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("connector.jpg"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), wire_sequence::InspectionError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RasterImage> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| InspectionError::ImageLoadError {
        message: format!("Unknown image format for file: {}", path.display()),
        source: None,
    })?;

    let reader = ImageReader::open(path)
        .map_err(|e| InspectionError::image_load(format!("Failed to open image file: {}", path.display()), e))?;

    let decoded: DynamicImage = reader
        .decode()
        .map_err(|e| InspectionError::image_load(format!("Failed to decode image: {}", path.display()), e))?;

    debug!(
        "decoded {:?} image {}x{} from {}",
        format,
        decoded.width(),
        decoded.height(),
        path.display()
    );

    RasterImage::from_rgb_image(&decoded.to_rgb8())
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp", "tga", "pbm", "pgm", "ppm", "pnm", "qoi",
    ]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension(Path::new("photo.jpg")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension(Path::new("photo.JPEG")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension(Path::new("photo.png")), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension(Path::new("photo.webp")), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_extension(Path::new("photo.heic")), None);
        assert_eq!(ImageFormat::from_extension(Path::new("photo")), None);
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("jpg"));
        assert!(is_supported_extension("JPEG"));
        assert!(is_supported_extension("png"));
        assert!(!is_supported_extension("heic"));
        assert!(!is_supported_extension("doc"));
    }

    #[test]
    fn test_unknown_extension_is_load_error() {
        let err = load_image(Path::new("connector.xyz")).unwrap_err();
        assert!(matches!(err, InspectionError::ImageLoadError { .. }));
    }

    #[test]
    fn test_png_is_loaded_as_bgr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixels.png");

        // 2x1: red, blue
        let mut rgb = image::RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        rgb.put_pixel(1, 0, image::Rgb([0, 0, 255]));
        rgb.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (2, 1));
        assert_eq!(loaded.pixel(0, 0).unwrap(), [0, 0, 255]);
        assert_eq!(loaded.pixel(1, 0).unwrap(), [255, 0, 0]);
    }
}
