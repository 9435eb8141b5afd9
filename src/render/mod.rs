//! Highlight Renderer
//!
//! Composites a located book onto the reference photo: the photo is dimmed,
//! the book's region is lit toward white and outlined, and an opaque caption
//! box with the title is placed above it.

pub mod animation;
pub mod caption;

pub use animation::HighlightAnimation;
pub use caption::{
    embedded_font, layout_caption, load_font, CaptionLayout, FallbackMetrics, TextMetrics,
    BASE_FONT_PX,
};

use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::{AnimationSettings, AppConfig, CaptionSettings, HighlightSettings};
use crate::error::{LocatorError, Result};
use crate::geometry::{
    caption_box, text_subregion, to_pixel_region, PixelBox, PixelPolygon, PixelRegion, Region,
};

/// Display settings handed to the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderConfig {
    pub highlight: HighlightSettings,
    pub caption: CaptionSettings,
    pub animation: AnimationSettings,
}

impl From<&AppConfig> for RenderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            highlight: config.highlight.clone(),
            caption: config.caption.clone(),
            animation: config.animation.clone(),
        }
    }
}

/// Caption box and its text layout
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionPlan {
    /// Opaque box, in image pixels
    pub rect: PixelBox,
    /// Wrapped text inside the box
    pub layout: CaptionLayout,
}

/// Pixel geometry of one highlight, before any compositing
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightPlan {
    pub width: u32,
    pub height: u32,
    /// The whole book region
    pub area: PixelRegion,
    /// The part that gets lit and outlined
    pub lit: PixelRegion,
    pub caption: Option<CaptionPlan>,
}

/// Load a reference photo
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| LocatorError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {:?} ({}x{})", path, img.width(), img.height());
    Ok(img.to_rgba8())
}

/// Turns a region and title into highlighted images
pub struct Renderer {
    config: RenderConfig,
    font: Option<FontVec>,
}

impl Renderer {
    /// Create a renderer, loading the caption font
    ///
    /// Captions are laid out but not drawn if no font can be loaded.
    pub fn new(config: RenderConfig) -> Self {
        let font = if config.caption.enabled {
            caption::load_font(config.caption.font_path.as_deref())
        } else {
            None
        };
        if config.caption.enabled && font.is_none() {
            warn!("No caption font could be loaded; captions will be skipped");
        }
        Self { config, font }
    }

    /// Create a renderer with an explicit font (or none)
    pub fn with_font(config: RenderConfig, font: Option<FontVec>) -> Self {
        Self { config, font }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn metrics(&self) -> &dyn TextMetrics {
        match &self.font {
            Some(font) => font as &dyn TextMetrics,
            None => &FallbackMetrics,
        }
    }

    /// Work out where everything goes on an image of the given size
    pub fn plan(
        &self,
        region: &Region,
        caption: Option<&str>,
        width: u32,
        height: u32,
    ) -> Result<HighlightPlan> {
        let area = to_pixel_region(region, width, height)?;
        let hl = &self.config.highlight;

        let lit = match area {
            PixelRegion::Box(b) if hl.text_only => {
                PixelRegion::Box(text_subregion(b, hl.text_ratio, width, height))
            }
            other => other,
        };

        let caption = match caption {
            Some(text) if self.config.caption.enabled => {
                self.plan_caption(text, &area, width, height)
            }
            _ => None,
        };

        Ok(HighlightPlan {
            width,
            height,
            area,
            lit,
            caption,
        })
    }

    fn plan_caption(
        &self,
        text: &str,
        area: &PixelRegion,
        width: u32,
        height: u32,
    ) -> Option<CaptionPlan> {
        let settings = &self.config.caption;
        let anchor = area.bounds(width, height);
        let rect = caption_box(
            anchor,
            settings.box_width,
            settings.box_height,
            settings.gap,
            width,
            height,
        );

        let inner_w = rect.width.saturating_sub(2 * settings.padding) as f32;
        let inner_h = rect.height.saturating_sub(2 * settings.padding) as f32;
        let layout = layout_caption(text, inner_w, inner_h, settings, self.metrics())?;

        Some(CaptionPlan { rect, layout })
    }

    /// Render a still highlight
    pub fn render(
        &self,
        image: &RgbaImage,
        region: &Region,
        caption: Option<&str>,
    ) -> Result<RgbaImage> {
        let plan = self.plan(region, caption, image.width(), image.height())?;
        Ok(self.compose(image, &plan, 1.0, None))
    }

    /// Composite a plan onto an image
    ///
    /// `intensity` scales how strongly the region is lit (1.0 = full). The
    /// optional glow mask is blended in with the given strength.
    pub(crate) fn compose(
        &self,
        image: &RgbaImage,
        plan: &HighlightPlan,
        intensity: f32,
        glow: Option<(&GrayImage, f32)>,
    ) -> RgbaImage {
        let hl = &self.config.highlight;
        let keep = hl.dim_keep.clamp(0.0, 1.0);
        let white = hl.white_blend.clamp(0.0, 1.0);
        let intensity = intensity.clamp(0.0, 1.0);
        let glow_color = self.config.animation.glow_color;

        let mask = region_mask(&plan.lit, plan.width, plan.height);
        let mut out = image.clone();

        for (x, y, px) in out.enumerate_pixels_mut() {
            let inside = mask.get_pixel(x, y)[0] > 0;
            let glow_weight = glow
                .map(|(g, strength)| g.get_pixel(x, y)[0] as f32 / 255.0 * strength)
                .unwrap_or(0.0);

            for c in 0..3 {
                let v = px[c] as f32;
                let dimmed = v * keep;
                let mut value = if inside {
                    let lit = v * (1.0 - white) + 255.0 * white;
                    dimmed + (lit - dimmed) * intensity
                } else {
                    dimmed
                };
                if glow_weight > 0.0 {
                    value += (glow_color[c] as f32 - value) * glow_weight.min(1.0);
                }
                px[c] = value.round().clamp(0.0, 255.0) as u8;
            }
            // Alpha unchanged
        }

        draw_outline(&mut out, &plan.lit, rgba(hl.border_color), hl.border_thickness, 0);

        if let Some(caption) = &plan.caption {
            self.draw_caption(&mut out, caption);
        }

        out
    }

    fn draw_caption(&self, canvas: &mut RgbaImage, caption: &CaptionPlan) {
        let settings = &self.config.caption;
        let rect = caption.rect;
        // An empty box would only hide part of the photo
        let Some(font) = &self.font else {
            return;
        };
        if rect.is_empty() {
            return;
        }
        draw_filled_rect_mut(
            canvas,
            Rect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height),
            rgba(settings.background_color),
        );

        let layout = &caption.layout;
        let color = rgba(settings.text_color);
        let mut top = rect.y as f32 + (rect.height as f32 - layout.block_height()) / 2.0;

        for line in &layout.lines {
            let line_width = font.text_width(line, layout.px);
            let left = rect.x as f32 + (rect.width as f32 - line_width) / 2.0;
            draw_text_mut(
                canvas,
                color,
                left.round() as i32,
                top.round() as i32,
                PxScale::from(layout.px),
                font,
                line,
            );
            top += layout.line_height + layout.line_spacing;
        }
    }
}

fn rgba(c: [u8; 3]) -> Rgba<u8> {
    Rgba([c[0], c[1], c[2], 255])
}

/// Filled mask of a pixel region (255 inside)
pub(crate) fn region_mask(region: &PixelRegion, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    match region {
        PixelRegion::Box(b) => fill_box(&mut mask, *b),
        PixelRegion::Polygon(p) => match polygon_points(p) {
            Some(points) => draw_polygon_mut(&mut mask, &points, Luma([255u8])),
            None => fill_box(&mut mask, p.bounds(width, height)),
        },
    }
    mask
}

fn fill_box(mask: &mut GrayImage, b: PixelBox) {
    if !b.is_empty() {
        draw_filled_rect_mut(
            mask,
            Rect::at(b.x as i32, b.y as i32).of_size(b.width, b.height),
            Luma([255u8]),
        );
    }
}

/// Integer polygon suitable for filling, or `None` if it collapsed
fn polygon_points(polygon: &PixelPolygon) -> Option<Vec<Point<i32>>> {
    let mut points: Vec<Point<i32>> = Vec::with_capacity(4);
    for &(x, y) in &polygon.points {
        let p = Point::new(x.round() as i32, y.round() as i32);
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    (points.len() >= 3).then_some(points)
}

/// Draw a region outline `thickness` pixels wide, `offset` pixels outside it
pub(crate) fn draw_outline<I>(
    canvas: &mut I,
    region: &PixelRegion,
    color: I::Pixel,
    thickness: u32,
    offset: i32,
)
where
    I: imageproc::drawing::Canvas,
{
    match region {
        PixelRegion::Box(b) => {
            for i in 0..thickness as i32 {
                let grow = offset + i;
                let w = b.width as i32 + 2 * grow;
                let h = b.height as i32 + 2 * grow;
                if w <= 0 || h <= 0 {
                    continue;
                }
                draw_hollow_rect_mut(
                    canvas,
                    Rect::at(b.x as i32 - grow, b.y as i32 - grow).of_size(w as u32, h as u32),
                    color,
                );
            }
        }
        PixelRegion::Polygon(p) => {
            let expanded = expand_polygon(p, offset as f32);
            let half = thickness as f32 / 2.0;
            for i in 0..4 {
                let a = expanded[i];
                let b = expanded[(i + 1) % 4];
                for step in 0..thickness.max(1) {
                    let d = step as f32 - half;
                    draw_line_segment_mut(canvas, (a.0 + d, a.1), (b.0 + d, b.1), color);
                    draw_line_segment_mut(canvas, (a.0, a.1 + d), (b.0, b.1 + d), color);
                }
            }
        }
    }
}

/// Push every corner `distance` pixels away from the centroid
pub(crate) fn expand_polygon(polygon: &PixelPolygon, distance: f32) -> [(f32, f32); 4] {
    let cx = polygon.points.iter().map(|p| p.0).sum::<f32>() / 4.0;
    let cy = polygon.points.iter().map(|p| p.1).sum::<f32>() / 4.0;
    polygon.points.map(|(x, y)| {
        let (dx, dy) = (x - cx, y - cy);
        let len = (dx * dx + dy * dy).sqrt();
        if len > f32::EPSILON {
            (x + dx / len * distance, y + dy / len * distance)
        } else {
            (x, y)
        }
    })
}
