//! Owned RGBA images and borrowed pixel samples.
//!
//! `Image` is an immutable row-major grid of `[u8; 4]` RGBA pixels.
//! Transformations never mutate an image in place; they build a new one.
//! `PixelSample` is the borrowed, format-independent view that correlation
//! and statistics consume. Two samples taken from equally-sized images share
//! the same pixel ordering.

use crate::util::{TintMatchError, TintMatchResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Owned RGBA image with contiguous row-major storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pixels: Vec<[u8; 4]>,
    width: usize,
    height: usize,
}

impl Image {
    /// Creates an image from a pixel vector of length `width * height`.
    pub fn from_pixels(pixels: Vec<[u8; 4]>, width: usize, height: usize) -> TintMatchResult<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(TintMatchError::BufferLength {
                expected: expected * 4,
                got: pixels.len() * 4,
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Creates an image from an interleaved RGBA byte buffer.
    pub fn from_rgba(data: &[u8], width: usize, height: usize) -> TintMatchResult<Self> {
        let expected = pixel_count(width, height)?
            .checked_mul(4)
            .ok_or(TintMatchError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(TintMatchError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Creates an image filled with a single pixel value.
    pub fn filled(width: usize, height: usize, px: [u8; 4]) -> TintMatchResult<Self> {
        let count = pixel_count(width, height)?;
        Ok(Self {
            pixels: vec![px; count],
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns all pixels in row-major order.
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Flattens the pixels into an interleaved RGBA byte buffer.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// Borrows the pixels as a sample for correlation and statistics.
    pub fn sample(&self) -> PixelSample<'_> {
        PixelSample {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }

    /// Builds a new image of the same size by mapping every pixel.
    pub fn map_pixels<F>(&self, f: F) -> Image
    where
        F: FnMut(&[u8; 4]) -> [u8; 4],
    {
        Image {
            pixels: self.pixels.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Like [`Image::map_pixels`], also passing the row-major pixel index.
    pub(crate) fn map_pixels_indexed<F>(&self, mut f: F) -> Image
    where
        F: FnMut(usize, &[u8; 4]) -> [u8; 4],
    {
        Image {
            pixels: self
                .pixels
                .iter()
                .enumerate()
                .map(|(idx, px)| f(idx, px))
                .collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Combines two equally-sized images pixel by pixel.
    pub(crate) fn zip_map<F>(&self, other: &Image, mut f: F) -> Image
    where
        F: FnMut(&[u8; 4], &[u8; 4]) -> [u8; 4],
    {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        Image {
            pixels: self
                .pixels
                .iter()
                .zip(other.pixels.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Borrowed row-major pixel sequence with its grid dimensions.
#[derive(Copy, Clone, Debug)]
pub struct PixelSample<'a> {
    pixels: &'a [[u8; 4]],
    width: usize,
    height: usize,
}

impl<'a> PixelSample<'a> {
    /// Creates a sample over an existing pixel slice.
    pub fn new(pixels: &'a [[u8; 4]], width: usize, height: usize) -> TintMatchResult<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(TintMatchError::BufferLength {
                expected: expected * 4,
                got: pixels.len() * 4,
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Returns `(width, height)` of the source grid.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns true when the sample holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns the pixels in row-major order.
    pub fn pixels(&self) -> &'a [[u8; 4]] {
        self.pixels
    }

    /// Iterates the alpha channel in the normalized domain.
    pub fn alpha(&self) -> impl Iterator<Item = f32> + 'a {
        self.pixels.iter().map(|px| px[3] as f32 / 255.0)
    }

    /// Iterates the HSV value channel.
    pub fn values(&self) -> impl Iterator<Item = f32> + 'a {
        self.pixels.iter().map(|&px| crate::color::pixel_value(px))
    }
}

fn pixel_count(width: usize, height: usize) -> TintMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(TintMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(TintMatchError::InvalidDimensions { width, height })
}
