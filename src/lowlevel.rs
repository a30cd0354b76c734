//! Low-level building blocks for custom recoloring pipelines.
//!
//! These expose the decomposition, colorization and tone primitives that
//! `extract` and `recolor` are built from. Most users should prefer the
//! top-level `Classifier`, `extract` and `recolor` APIs.

pub use crate::color::{hsv_to_rgb, pixel_hsv, pixel_value, rgb_to_hsv, Hsv};
pub use crate::kernel::{correlate_channels, Correlation};
pub use crate::layers::{colorize, composite, decompose, ColorizeParams, Layer};
pub use crate::stats::hue_distance;
pub use crate::tone::{brightness, contrast, lightness_extrema, lightness_variance, mean_value};
