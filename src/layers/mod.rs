//! Luminance-layer decomposition, per-layer colorization and recomposition.
//!
//! `decompose` splits the visible pixels of an image into `k` disjoint bands
//! by ascending HSV value. Pixels are ranked by `(value, row-major index)`
//! and the pixel of rank `r` out of `n` lands in band `r * k / n`, so bands
//! are as equal in size as possible and the split is deterministic. Layer 0
//! is always the darkest band. Metadata extraction and recoloring both go
//! through this function, which keeps per-layer hue and saturation aligned
//! with the same luminance bands at both ends.

use crate::color::{hsv_to_pixel, pixel_hsv, pixel_value, wrap_unit, Hsv};
use crate::image::Image;
use crate::util::math::u8_to_unit;
use crate::util::{TintMatchError, TintMatchResult};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Largest layer count accepted by metadata extraction and validation.
pub const MAX_LAYERS: usize = 256;

/// One luminance band of a decomposed image.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Full-size image holding only this band's pixels; others are transparent.
    pub image: Image,
    /// Alpha-weighted mean RGB of the band in `[0, 1]`; black when empty.
    pub color: [f32; 3],
    /// Number of pixels in the band.
    pub pixel_count: usize,
}

/// Splits `image` into `layer_count` luminance-ordered layers.
///
/// Always returns exactly `layer_count` layers, darkest first. Bands are
/// empty when the image has fewer visible pixels than layers.
pub fn decompose(image: &Image, layer_count: usize) -> Vec<Layer> {
    if layer_count == 0 {
        return Vec::new();
    }
    let pixels = image.pixels();

    let mut ranked: Vec<(f32, usize)> = pixels
        .iter()
        .enumerate()
        .filter(|(_, px)| px[3] > 0)
        .map(|(idx, &px)| (pixel_value(px), idx))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let n = ranked.len();
    let mut band_of = vec![usize::MAX; pixels.len()];
    for (rank, &(_, idx)) in ranked.iter().enumerate() {
        band_of[idx] = (rank as u128 * layer_count as u128 / n as u128) as usize;
    }

    (0..layer_count)
        .map(|band| {
            let mut sum = [0.0f64; 3];
            let mut weight = 0.0f64;
            let mut count = 0usize;
            let layer = image.map_pixels_indexed(|idx, &px| {
                if band_of[idx] != band {
                    return TRANSPARENT;
                }
                let a = u8_to_unit(px[3]) as f64;
                for (acc, &c) in sum.iter_mut().zip(px.iter()) {
                    *acc += u8_to_unit(c) as f64 * a;
                }
                weight += a;
                count += 1;
                px
            });
            let color = if weight > 0.0 {
                sum.map(|c| (c / weight) as f32)
            } else {
                [0.0; 3]
            };
            Layer {
                image: layer,
                color,
                pixel_count: count,
            }
        })
        .collect()
}

/// Colorization parameters beyond the target hue and saturation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorizeParams {
    /// Added to the target hue, in turns.
    pub rotation: f32,
    /// Multiplies the target saturation.
    pub scale: f32,
    /// Multiplies each pixel's value.
    pub scale2: f32,
    /// Added to each pixel's value after scaling.
    pub offset: f32,
}

impl Default for ColorizeParams {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: 1.0,
            scale2: 1.0,
            offset: 0.0,
        }
    }
}

/// Imposes a hue and saturation on every visible pixel of a layer.
///
/// With default params each pixel keeps its HSV value and alpha.
pub fn colorize(layer: &Image, hue: f32, saturation: f32, params: ColorizeParams) -> Image {
    let h = wrap_unit(hue + params.rotation);
    let s = (saturation * params.scale).clamp(0.0, 1.0);
    layer.map_pixels(|&px| {
        if px[3] == 0 {
            return px;
        }
        let v = (pixel_hsv(px).v * params.scale2 + params.offset).clamp(0.0, 1.0);
        hsv_to_pixel(Hsv { h, s, v }, px[3])
    })
}

/// Composites layers in order ("over") onto a transparent canvas.
pub fn composite(layers: &[Image]) -> TintMatchResult<Image> {
    let first = layers
        .first()
        .ok_or(TintMatchError::InvalidInput("composite needs at least one layer"))?;
    let dims = first.dimensions();
    if let Some(bad) = layers.iter().find(|l| l.dimensions() != dims) {
        return Err(TintMatchError::DimensionMismatch {
            expected: dims,
            got: bad.dimensions(),
        });
    }

    let mut canvas = Image::filled(dims.0, dims.1, TRANSPARENT)?;
    for layer in layers {
        canvas = canvas.zip_map(layer, over);
    }
    Ok(canvas)
}

/// Straight-alpha "over" of `top` onto `bottom`.
fn over(bottom: &[u8; 4], top: &[u8; 4]) -> [u8; 4] {
    match (bottom[3], top[3]) {
        (_, 255) | (0, _) => *top,
        (_, 0) => *bottom,
        (ba, ta) => {
            let ta = u8_to_unit(ta);
            let ba = u8_to_unit(ba) * (1.0 - ta);
            let out_a = ta + ba;
            let mut out = [0u8; 4];
            for c in 0..3 {
                let v = (u8_to_unit(top[c]) * ta + u8_to_unit(bottom[c]) * ba) / out_a;
                out[c] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
            out[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{colorize, composite, decompose, over, ColorizeParams};
    use crate::color::pixel_hsv;
    use crate::image::Image;

    fn ramp() -> Image {
        let pixels = (0..8u8).map(|i| [i * 30, i * 10, 5, 255]).collect();
        Image::from_pixels(pixels, 4, 2).unwrap()
    }

    #[test]
    fn decompose_splits_into_ascending_bands() {
        let img = ramp();
        let layers = decompose(&img, 3);
        assert_eq!(layers.len(), 3);
        let counts: Vec<usize> = layers.iter().map(|l| l.pixel_count).collect();
        assert_eq!(counts.iter().sum::<usize>(), 8);
        assert_eq!(counts, vec![3, 3, 2]);
        let means: Vec<f32> = layers.iter().map(|l| l.color[0]).collect();
        assert!(means.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn decompose_gives_one_pixel_per_band_when_counts_match() {
        let layers = decompose(&ramp(), 8);
        assert!(layers.iter().all(|l| l.pixel_count == 1));
        let big = decompose(&ramp(), 20);
        assert_eq!(big.len(), 20);
        assert_eq!(big.iter().map(|l| l.pixel_count).sum::<usize>(), 8);
    }

    #[test]
    fn decompose_pads_with_empty_bands() {
        let img = Image::filled(1, 1, [200, 10, 10, 255]).unwrap();
        let layers = decompose(&img, 3);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers.iter().filter(|l| l.pixel_count == 1).count(), 1);
        assert!(decompose(&img, 0).is_empty());
    }

    #[test]
    fn composite_of_decomposition_restores_image() {
        let img = ramp();
        let layers: Vec<Image> = decompose(&img, 4).into_iter().map(|l| l.image).collect();
        assert_eq!(composite(&layers).unwrap(), img);
    }

    #[test]
    fn colorize_keeps_value_and_alpha() {
        let img = Image::from_pixels(vec![[40, 80, 120, 255], [0, 0, 0, 0]], 2, 1).unwrap();
        let out = colorize(&img, 0.0, 1.0, ColorizeParams::default());
        let hsv = pixel_hsv(out.pixels()[0]);
        assert!((hsv.v - 120.0 / 255.0).abs() < 1e-6);
        assert!(hsv.h.abs() < 1e-3);
        assert!((hsv.s - 1.0).abs() < 1e-6);
        assert_eq!(out.pixels()[1], [0, 0, 0, 0]);
    }

    #[test]
    fn composite_rejects_bad_input() {
        assert!(composite(&[]).is_err());
        let a = Image::filled(2, 2, [0, 0, 0, 255]).unwrap();
        let b = Image::filled(3, 2, [0, 0, 0, 255]).unwrap();
        assert!(composite(&[a, b]).is_err());
    }

    #[test]
    fn over_blends_partial_alpha() {
        let out = over(&[0, 0, 255, 255], &[255, 0, 0, 128]);
        assert_eq!(out[3], 255);
        assert!(out[0] > 120 && out[2] > 120);
    }
}
