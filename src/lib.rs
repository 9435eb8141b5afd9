//! ShelfSpot - find a book on the shelf and show where it sits
//!
//! Resolves a free-text book name against a catalog of shelved books, maps
//! the book's stored region onto a reference photo and renders a highlight
//! with the title in a caption box.

pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod sink;
pub mod storage;

pub use catalog::{BookMatch, BookRecord, BookUpdate, Catalog, MatchRule};
pub use config::AppConfig;
pub use error::{LocatorError, Result};
pub use geometry::{NormBox, PixelBox, PixelRegion, Quad, Region};
pub use render::{HighlightAnimation, HighlightPlan, RenderConfig, Renderer};
pub use sink::{FileSink, HighlightOutput, HighlightSink, WindowSink};
