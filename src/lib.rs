//! TintMatch classifies RGBA images against key templates by gated
//! value-channel correlation and recolors value templates from stored color
//! metadata.
//!
//! The statistical core (correlation, classification, metadata extraction,
//! recoloring) is pure and works on in-memory [`Image`] values. Filesystem
//! batch stages live behind the `image-io` feature, with optional
//! parallelism via the `rayon` feature.

pub mod bank;
pub mod color;
pub mod image;
pub mod kernel;
pub mod layers;
pub mod lowlevel;
#[cfg(feature = "image-io")]
pub mod pipeline;
pub mod recolor;
pub mod search;
pub mod stats;
pub mod tone;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use bank::{pair_templates, TemplateBank, TemplatePairing};
pub use crate::image::{Image, PixelSample};
pub use kernel::{correlate, ALPHA_GATE};
pub use recolor::{recolor, recolor_with, RecolorConfig};
pub use search::{Assignment, Classification, Classifier, ClassifyConfig};
pub use stats::{circular_sort, extract, ColorMetadata, MetadataConfig};
pub use util::{TintMatchError, TintMatchResult};
