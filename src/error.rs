use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Contract violations raised by grid access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has not been initialized yet.
    #[error("tile grid is not initialized")]
    Uninitialized,
    /// Requested grid size has a non-positive dimension.
    #[error("invalid grid size {width}x{height}: both dimensions must be positive")]
    InvalidSize {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
    /// Coordinates fall outside the initialized grid.
    #[error("tile {x},{y} is outside the initialized size {width}x{height}")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
}

/// Errors raised while reading a sprite manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// File I/O error.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// JSON parse error.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Unsupported file format (non-JSON).
    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(PathBuf),
    /// Manifest values that cannot drive a viewport.
    #[error("invalid manifest: {0}")]
    Invalid(String),
}
