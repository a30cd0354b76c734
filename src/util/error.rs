//! Error types for tintmatch.

use thiserror::Error;

/// Result alias for tintmatch operations.
pub type TintMatchResult<T> = std::result::Result<T, TintMatchError>;

/// Errors that can occur when building images, metadata or batch outputs.
///
/// Low scores (size or alpha mismatch, below-threshold matches) are never
/// errors; they surface as a `0.0` score or an absent assignment.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TintMatchError {
    /// Width or height is zero or overflows the pixel count.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Raw buffer length does not match the declared dimensions.
    #[error("buffer length mismatch: expected {expected} bytes, got {got}")]
    BufferLength { expected: usize, got: usize },
    /// Two images that must share a grid have different sizes.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Metadata hue and saturation sequences differ in length.
    #[error("metadata mismatch: {hues} hues vs {sats} saturations")]
    MetadataMismatch { hues: usize, sats: usize },
    /// Metadata contains values outside their domain.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(&'static str),
    /// Decoding or encoding an image file failed.
    #[error("image i/o failed for {path}: {reason}")]
    ImageIo { path: String, reason: String },
    /// Filesystem access failed.
    #[error("i/o failed for {path}: {reason}")]
    Io { path: String, reason: String },
    /// Metadata document could not be parsed or written.
    #[error("json failed for {path}: {reason}")]
    Json { path: String, reason: String },
}
