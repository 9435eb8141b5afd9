//! Error types for shelfspot.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the catalog, geometry and rendering layers.
///
/// A query that matches no book is not an error; `Catalog::search`
/// returns `None` for it.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Region data is malformed (wrong point count, NaN, negative size).
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// The reference image could not be read or decoded.
    #[error("failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No record with this key exists in the catalog.
    #[error("unknown book: {0}")]
    UnknownBook(String),

    /// A record with this key already exists in the catalog.
    #[error("book already exists: {0}")]
    DuplicateBook(String),

    /// The key is empty after normalization.
    #[error("book key is empty")]
    EmptyKey,

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The interactive window could not be opened.
    #[error("window error: {0}")]
    Window(String),
}

/// Result type for shelfspot operations.
pub type Result<T> = std::result::Result<T, LocatorError>;
