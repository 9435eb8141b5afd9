//! Highlight Sinks
//!
//! Where a rendered highlight ends up: an image file or a window.

mod file;
mod window;

pub use file::FileSink;
pub use window::WindowSink;

use image::RgbaImage;

use crate::error::Result;
use crate::render::HighlightAnimation;

/// A rendered highlight
#[derive(Debug, Clone)]
pub enum HighlightOutput {
    Still(RgbaImage),
    Animation(HighlightAnimation),
}

impl HighlightOutput {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            HighlightOutput::Still(img) => Some(img.dimensions()),
            HighlightOutput::Animation(anim) => anim.dimensions(),
        }
    }
}

/// Something that can show or store a highlight
pub trait HighlightSink {
    fn present(&mut self, output: &HighlightOutput) -> Result<()>;
}
