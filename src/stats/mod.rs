//! Color-distribution metadata extracted from classified images.
//!
//! A `ColorMetadata` record summarises one image: per-layer hues (circularly
//! sorted), saturations (descending) and values (ascending) from the
//! luminance decomposition, plus whole-image mean lightness and lightness
//! variance. Records are persisted between the analysis and synthesis runs
//! and validated when read back.

mod hue;

pub use hue::{circular_sort, hue_distance};

use crate::color::rgb_to_hsv;
use crate::image::Image;
use crate::layers::{decompose, MAX_LAYERS};
use crate::tone::{lightness_extrema, lightness_variance, mean_value};
use crate::trace::{trace_event, trace_span};
use crate::util::{TintMatchError, TintMatchResult};
use std::path::{Component, Path};

/// Configuration for metadata extraction.
#[derive(Clone, Debug)]
pub struct MetadataConfig {
    /// Number of luminance layers sampled per image.
    pub layer_count: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self { layer_count: 4 }
    }
}

/// Persisted color summary that drives recoloring.
///
/// `hues` and `sats` always have the same length; `vals` is independent
/// metadata and may differ in length.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(deny_unknown_fields)
)]
pub struct ColorMetadata {
    /// Name of the template the source image was classified as.
    pub template: String,
    /// Per-layer hues in `[0, 1)`, circularly sorted.
    pub hues: Vec<f32>,
    /// Per-layer saturations in `[0, 1]`, descending.
    pub sats: Vec<f32>,
    /// Per-layer values in `[0, 1]`, ascending.
    pub vals: Vec<f32>,
    /// Mean HSV value of the source image.
    pub lightness: f32,
    /// Variance of the HSV value of the source image.
    pub variance: f32,
}

impl ColorMetadata {
    /// Number of color layers the record describes.
    pub fn layer_count(&self) -> usize {
        self.sats.len()
    }

    /// Checks the record invariants.
    pub fn validate(&self) -> TintMatchResult<()> {
        if self.hues.len() != self.sats.len() {
            return Err(TintMatchError::MetadataMismatch {
                hues: self.hues.len(),
                sats: self.sats.len(),
            });
        }
        if self.template.is_empty() {
            return Err(TintMatchError::InvalidMetadata("template name is empty"));
        }
        if !is_plain_file_name(&self.template) {
            return Err(TintMatchError::InvalidMetadata("template must be a plain file name"));
        }
        if self.sats.len() > MAX_LAYERS {
            return Err(TintMatchError::InvalidMetadata("more layers than MAX_LAYERS"));
        }
        if !self.hues.iter().all(|h| h.is_finite() && (0.0..1.0).contains(h)) {
            return Err(TintMatchError::InvalidMetadata("hue outside [0, 1)"));
        }
        if !self.sats.iter().all(|s| (0.0..=1.0).contains(s)) {
            return Err(TintMatchError::InvalidMetadata("saturation outside [0, 1]"));
        }
        if !self.vals.iter().all(|v| (0.0..=1.0).contains(v)) {
            return Err(TintMatchError::InvalidMetadata("value outside [0, 1]"));
        }
        if !self.lightness.is_finite() || !self.variance.is_finite() || self.variance < 0.0 {
            return Err(TintMatchError::InvalidMetadata("lightness or variance not finite"));
        }
        Ok(())
    }
}

/// Template names resolve inside the value directory, so only a single
/// normal path component is accepted.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Extracts color metadata from `image` using `layer_count` luminance layers.
///
/// `template` is the name the image was classified as. Fails when
/// `layer_count` exceeds [`MAX_LAYERS`].
pub fn extract(template: &str, image: &Image, layer_count: usize) -> TintMatchResult<ColorMetadata> {
    if layer_count > MAX_LAYERS {
        return Err(TintMatchError::InvalidInput("layer_count exceeds MAX_LAYERS"));
    }
    let _span = trace_span!("extract", template = template, layers = layer_count).entered();

    let (mut hues, mut sats, mut vals) = (Vec::new(), Vec::new(), Vec::new());
    for layer in decompose(image, layer_count) {
        let [r, g, b] = layer.color;
        let hsv = rgb_to_hsv(r, g, b);
        hues.push(hsv.h);
        sats.push(hsv.s);
        vals.push(hsv.v);
    }

    let hues = circular_sort(&hues);
    sats.sort_by(|a, b| b.total_cmp(a));
    vals.sort_by(f32::total_cmp);

    let lightness = mean_value(image);
    let variance = lightness_variance(image);
    trace_event!("extracted", lightness = lightness, variance = variance);
    if let Some((min, max)) = lightness_extrema(image) {
        trace_event!("tonal_range", min = min, max = max);
    }

    Ok(ColorMetadata {
        template: template.to_string(),
        hues,
        sats,
        vals,
        lightness,
        variance,
    })
}
