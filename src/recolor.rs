//! Recoloring a base image from stored color metadata.
//!
//! The base image is first tone-matched to the metadata (damped contrast
//! correction, then a brightness shift to the stored mean lightness). It is
//! then decomposed into `metadata.sats.len()` luminance layers. Layer `i`
//! takes hue `hues[i]` and saturation `sats[i]` and the layers are
//! recomposited. Alpha and per-pixel value ordering of the base survive.

use crate::image::Image;
use crate::layers::{colorize, composite, decompose, ColorizeParams};
use crate::stats::ColorMetadata;
use crate::tone::{brightness, contrast, lightness_variance, mean_value};
use crate::trace::{trace_event, trace_span};
use crate::util::TintMatchResult;

/// Configuration for recoloring.
#[derive(Clone, Debug)]
pub struct RecolorConfig {
    /// Fraction of the variance difference applied as a contrast change.
    pub contrast_damping: f32,
}

impl Default for RecolorConfig {
    fn default() -> Self {
        Self {
            contrast_damping: 0.3,
        }
    }
}

/// Recolors `base` with default configuration.
pub fn recolor(base: &Image, metadata: &ColorMetadata) -> TintMatchResult<Image> {
    recolor_with(base, metadata, &RecolorConfig::default())
}

/// Recolors `base` so its tone and palette follow `metadata`.
///
/// Fails only when the metadata is invalid. Empty `hues`/`sats` skip the
/// layer pass and return the tone-adjusted base.
pub fn recolor_with(
    base: &Image,
    metadata: &ColorMetadata,
    cfg: &RecolorConfig,
) -> TintMatchResult<Image> {
    metadata.validate()?;
    let layer_count = metadata.layer_count();
    let _span = trace_span!(
        "recolor",
        template = metadata.template.as_str(),
        layers = layer_count
    )
    .entered();

    let contrast_delta = (lightness_variance(base) - metadata.variance) * cfg.contrast_damping;
    let adjusted = contrast(base, contrast_delta);

    let brightness_delta = metadata.lightness - mean_value(&adjusted);
    let adjusted = brightness(&adjusted, brightness_delta);
    trace_event!(
        "tone_adjusted",
        contrast_delta = contrast_delta,
        brightness_delta = brightness_delta
    );

    if layer_count == 0 {
        return Ok(adjusted);
    }

    let colorized: Vec<Image> = decompose(&adjusted, layer_count)
        .iter()
        .zip(metadata.hues.iter().zip(metadata.sats.iter()))
        .map(|(layer, (&hue, &sat))| colorize(&layer.image, hue, sat, ColorizeParams::default()))
        .collect();

    composite(&colorized)
}
