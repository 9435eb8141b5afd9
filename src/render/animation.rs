//! Pulsing highlight animation
//!
//! One pulse is a finite loop of frames: the lit region brightens and dims
//! along a raised cosine while a blurred glow outline grows and shrinks with
//! it. The last frame leads back into the first without a jump.

use image::{GrayImage, Luma, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use std::f32::consts::TAU;
use tracing::debug;

use super::{draw_outline, Renderer};
use crate::error::Result;
use crate::geometry::{PixelRegion, Region};

/// Width of the glow outline before blurring, in pixels
const GLOW_LINE_WIDTH: u32 = 4;

/// A finite, replayable sequence of highlight frames
#[derive(Debug, Clone)]
pub struct HighlightAnimation {
    frames: Vec<RgbaImage>,
    frame_delay_ms: u32,
}

impl HighlightAnimation {
    pub fn new(frames: Vec<RgbaImage>, frame_delay_ms: u32) -> Self {
        Self { frames, frame_delay_ms }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, wrapping around so playback can loop forever
    pub fn frame(&self, index: usize) -> Option<&RgbaImage> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get(index % self.frames.len())
    }

    /// Iterate from the first frame; can be called any number of times
    pub fn iter(&self) -> impl Iterator<Item = &RgbaImage> {
        self.frames.iter()
    }

    pub fn frame_delay_ms(&self) -> u32 {
        self.frame_delay_ms
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| f.dimensions())
    }
}

/// Pulse phase of frame `index` out of `count`, in [0, 1]
///
/// Frame 0 and frame `count` share the same phase.
pub fn pulse(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    let t = index as f32 / count as f32;
    (1.0 - (TAU * t).cos()) / 2.0
}

/// Blurred outline around a region, pushed `grow` pixels outward
pub fn glow_mask(
    region: &PixelRegion,
    grow: f32,
    sigma: f32,
    width: u32,
    height: u32,
) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    draw_outline(&mut mask, region, Luma([255u8]), GLOW_LINE_WIDTH, grow.round() as i32);
    if sigma > 0.0 {
        gaussian_blur_f32(&mask, sigma)
    } else {
        mask
    }
}

impl Renderer {
    /// Render a pulsing highlight
    pub fn render_animation(
        &self,
        image: &RgbaImage,
        region: &Region,
        caption: Option<&str>,
    ) -> Result<HighlightAnimation> {
        let plan = self.plan(region, caption, image.width(), image.height())?;
        let settings = &self.config().animation;
        let count = settings.frames.max(1);
        let floor = settings.min_intensity.clamp(0.0, 1.0);

        let frames = (0..count)
            .map(|i| {
                let phase = pulse(i, count);
                let intensity = floor + (1.0 - floor) * phase;
                let glow = glow_mask(
                    &plan.lit,
                    settings.glow_radius * phase,
                    settings.glow_sigma,
                    plan.width,
                    plan.height,
                );
                self.compose(image, &plan, intensity, Some((&glow, phase)))
            })
            .collect();

        debug!("Rendered {} animation frames", count);
        Ok(HighlightAnimation::new(frames, settings.frame_delay_ms))
    }
}
