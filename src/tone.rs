//! Whole-image tone statistics and adjustments on the HSV value channel.
//!
//! Only visible pixels (alpha > 0) contribute to statistics or are adjusted.
//! Adjustments keep hue, saturation and alpha of every pixel.

use crate::color::{hsv_to_pixel, pixel_hsv, pixel_value};
use crate::image::Image;
use crate::util::math::mean_variance;

fn visible_values(image: &Image) -> impl Iterator<Item = f32> + '_ {
    image
        .pixels()
        .iter()
        .filter(|px| px[3] > 0)
        .map(|&px| pixel_value(px))
}

/// Mean HSV value of the visible pixels, 0 when none are visible.
pub fn mean_value(image: &Image) -> f32 {
    mean_variance(visible_values(image)).map_or(0.0, |(mean, _)| mean)
}

/// Population variance of the visible HSV values, 0 when none are visible.
pub fn lightness_variance(image: &Image) -> f32 {
    mean_variance(visible_values(image)).map_or(0.0, |(_, var)| var)
}

/// Minimum and maximum visible HSV value.
pub fn lightness_extrema(image: &Image) -> Option<(f32, f32)> {
    visible_values(image).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Shifts the value channel by `delta`, clamping to `[0, 1]`.
pub fn brightness(image: &Image, delta: f32) -> Image {
    if delta == 0.0 {
        return image.clone();
    }
    remap_values(image, |v| v + delta)
}

/// Scales the value spread around the visible mean by `1 - delta`.
///
/// A positive `delta` flattens contrast, a negative one expands it. The
/// scale factor never drops below zero, so `delta >= 1` yields a flat image
/// at the mean value.
pub fn contrast(image: &Image, delta: f32) -> Image {
    if delta == 0.0 {
        return image.clone();
    }
    let mean = mean_value(image);
    let factor = (1.0 - delta).max(0.0);
    remap_values(image, |v| mean + (v - mean) * factor)
}

fn remap_values<F>(image: &Image, f: F) -> Image
where
    F: Fn(f32) -> f32,
{
    image.map_pixels(|&px| {
        if px[3] == 0 {
            return px;
        }
        let mut hsv = pixel_hsv(px);
        hsv.v = f(hsv.v).clamp(0.0, 1.0);
        hsv_to_pixel(hsv, px[3])
    })
}
