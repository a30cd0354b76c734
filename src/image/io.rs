//! Convenience helpers for loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::Image;
use crate::util::{TintMatchError, TintMatchResult};
use std::path::Path;

/// Creates an owned image from an RGBA buffer.
pub fn image_from_rgba8(img: &image::RgbaImage) -> TintMatchResult<Image> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Image::from_rgba(img.as_raw(), width, height)
}

/// Creates an owned image from a dynamic image, converting to RGBA.
pub fn image_from_dynamic(img: &image::DynamicImage) -> TintMatchResult<Image> {
    image_from_rgba8(&img.to_rgba8())
}

/// Converts an owned image back into an `image` RGBA buffer.
pub fn image_to_rgba8(img: &Image) -> TintMatchResult<image::RgbaImage> {
    let (width, height) = img.dimensions();
    let too_large = TintMatchError::InvalidDimensions { width, height };
    let w = u32::try_from(width).map_err(|_| too_large.clone())?;
    let h = u32::try_from(height).map_err(|_| too_large.clone())?;
    image::RgbaImage::from_raw(w, h, img.to_rgba()).ok_or(too_large)
}

/// Loads an image from disk and converts it to RGBA.
pub fn load_image<P: AsRef<Path>>(path: P) -> TintMatchResult<Image> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| TintMatchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    image_from_dynamic(&img)
}

/// Saves an image to disk; the format follows the file extension.
pub fn save_image<P: AsRef<Path>>(img: &Image, path: P) -> TintMatchResult<()> {
    let path = path.as_ref();
    let buffer = image_to_rgba8(img)?;
    buffer.save(path).map_err(|err| TintMatchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}
