//! JSON persistence for color metadata records.

use crate::stats::ColorMetadata;
use crate::util::{TintMatchError, TintMatchResult};
use std::fs;
use std::path::Path;

/// Reads and validates a metadata record.
pub fn read_metadata(path: &Path) -> TintMatchResult<ColorMetadata> {
    let text = fs::read_to_string(path).map_err(|err| TintMatchError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let meta: ColorMetadata = serde_json::from_str(&text).map_err(|err| TintMatchError::Json {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    meta.validate()?;
    Ok(meta)
}

/// Writes a metadata record, creating parent directories.
pub fn write_metadata(path: &Path, meta: &ColorMetadata) -> TintMatchResult<()> {
    let io_err = |err: std::io::Error| TintMatchError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string(meta).map_err(|err| TintMatchError::Json {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    fs::write(path, json).map_err(io_err)
}
