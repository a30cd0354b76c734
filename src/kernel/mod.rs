//! Correlation kernel between two pixel samples.
//!
//! The score is the Pearson coefficient of the HSV value channels, gated by
//! the Pearson coefficient of the alpha channels. Value correlation ignores
//! global brightness scaling; the alpha gate rejects candidates whose
//! silhouette differs from the template even when their shading matches.

use crate::image::PixelSample;
use crate::util::math::pearson;

/// Minimum alpha correlation for two samples to be structurally comparable.
pub const ALPHA_GATE: f32 = 0.99;

/// Per-channel correlations behind a score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correlation {
    /// Pearson coefficient of the HSV value channels.
    pub value: f32,
    /// Pearson coefficient of the alpha channels.
    pub alpha: f32,
}

impl Correlation {
    /// Gated score: the value correlation, or 0 when the alpha gate fails.
    pub fn score(&self) -> f32 {
        if self.alpha < ALPHA_GATE {
            0.0
        } else {
            self.value
        }
    }
}

/// Computes both channel correlations, `None` when the grids differ in size.
pub fn correlate_channels(template: PixelSample<'_>, candidate: PixelSample<'_>) -> Option<Correlation> {
    if template.dimensions() != candidate.dimensions() {
        return None;
    }
    Some(Correlation {
        value: pearson(template.values(), candidate.values()),
        alpha: pearson(template.alpha(), candidate.alpha()),
    })
}

/// Similarity of `candidate` to `template` in `[-1, 1]`.
///
/// Returns 0 when the samples are not comparable: different `(width, height)`
/// or an alpha correlation below [`ALPHA_GATE`].
pub fn correlate(template: PixelSample<'_>, candidate: PixelSample<'_>) -> f32 {
    correlate_channels(template, candidate)
        .map(|c| c.score())
        .unwrap_or(0.0)
}
