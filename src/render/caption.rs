//! Caption layout
//!
//! Wraps a book title into the fixed caption box, stepping down through the
//! configured font scales until the block fits.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::CaptionSettings;

/// Pixel size of a font at scale 1.0
pub const BASE_FONT_PX: f32 = 30.0;

/// Horizontal advance of the fallback metric, as a share of the pixel size
const FALLBACK_ADVANCE: f32 = 0.55;

/// Line height of the fallback metric, as a share of the pixel size
const FALLBACK_LINE_HEIGHT: f32 = 1.2;

/// Fonts tried when none is configured
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Measures text for layout
pub trait TextMetrics {
    /// Width of a single line in pixels
    fn text_width(&self, text: &str, px: f32) -> f32;

    /// Height of one line (without extra spacing) in pixels
    fn line_height(&self, px: f32) -> f32;
}

impl TextMetrics for FontVec {
    fn text_width(&self, text: &str, px: f32) -> f32 {
        let scaled = self.as_scaled(PxScale::from(px));
        let mut width = 0.0;
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }

    fn line_height(&self, px: f32) -> f32 {
        self.as_scaled(PxScale::from(px)).height()
    }
}

/// Fixed-advance metric for layout when no font could be loaded at all
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackMetrics;

impl TextMetrics for FallbackMetrics {
    fn text_width(&self, text: &str, px: f32) -> f32 {
        text.chars().count() as f32 * px * FALLBACK_ADVANCE
    }

    fn line_height(&self, px: f32) -> f32 {
        px * FALLBACK_LINE_HEIGHT
    }
}

/// Load a caption font
///
/// Tries the configured file, then well-known system fonts, then the font
/// bundled with egui. A configured path that cannot be read only costs a
/// warning.
pub fn load_font(configured: Option<&Path>) -> Option<FontVec> {
    if let Some(path) = configured {
        if let Some(font) = read_font(path) {
            return Some(font);
        }
        warn!("Caption font {:?} is unavailable, trying system fonts", path);
    }

    SYSTEM_FONTS
        .iter()
        .find_map(|path| read_font(Path::new(path)))
        .or_else(|| {
            debug!("No system font found, using the bundled caption font");
            embedded_font()
        })
}

fn read_font(path: &Path) -> Option<FontVec> {
    let bytes = std::fs::read(path).ok()?;
    match FontVec::try_from_vec(bytes) {
        Ok(font) => {
            debug!("Using caption font {:?}", path);
            Some(font)
        }
        Err(e) => {
            warn!("Could not parse font {:?}: {}", path, e);
            None
        }
    }
}

/// The proportional font egui ships with
pub fn embedded_font() -> Option<FontVec> {
    let fonts = egui::FontDefinitions::default();
    let name = fonts.families.get(&egui::FontFamily::Proportional)?.first()?;
    let data = fonts.font_data.get(name)?;
    FontVec::try_from_vec_and_index(data.font.to_vec(), data.index).ok()
}

/// Where the caption text goes inside its box
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    /// Wrapped lines, top to bottom
    pub lines: Vec<String>,
    /// Font scale that was chosen
    pub scale: f32,
    /// Font pixel size (scale x base size)
    pub px: f32,
    /// Height of a single line in pixels
    pub line_height: f32,
    /// Extra pixels between lines
    pub line_spacing: f32,
    /// Lines were dropped because nothing fit
    pub truncated: bool,
}

impl CaptionLayout {
    /// Total height of the text block
    pub fn block_height(&self) -> f32 {
        block_height(self.lines.len(), self.line_height, self.line_spacing)
    }
}

fn block_height(lines: usize, line_height: f32, spacing: f32) -> f32 {
    if lines == 0 {
        return 0.0;
    }
    lines as f32 * line_height + (lines - 1) as f32 * spacing
}

/// Greedy word wrap to a pixel width
///
/// A word wider than the line stays on a line of its own.
pub fn wrap_words(text: &str, max_width: f32, px: f32, metrics: &dyn TextMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if metrics.text_width(&candidate, px) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Fit a caption into an inner area of `width` x `height` pixels
///
/// Returns `None` for blank text. Scales are tried in order; the first one
/// whose wrapped block fits wins. If none fits, the last scale is used and
/// the block is cut to `max_lines`.
pub fn layout_caption(
    text: &str,
    width: f32,
    height: f32,
    settings: &CaptionSettings,
    metrics: &dyn TextMetrics,
) -> Option<CaptionLayout> {
    if text.trim().is_empty() {
        return None;
    }

    let max_lines = settings.max_lines.max(1);
    let spacing = settings.line_spacing as f32;
    let scales: &[f32] = if settings.font_scales.is_empty() {
        &[1.0]
    } else {
        &settings.font_scales
    };

    let mut last = None;
    for &scale in scales {
        let px = scale * BASE_FONT_PX;
        let line_height = metrics.line_height(px);
        let lines = wrap_words(text, width, px, metrics);

        let fits = lines.len() <= max_lines
            && block_height(lines.len(), line_height, spacing) <= height
            && lines.iter().all(|l| metrics.text_width(l, px) <= width);

        if fits {
            return Some(CaptionLayout {
                lines,
                scale,
                px,
                line_height,
                line_spacing: spacing,
                truncated: false,
            });
        }
        last = Some((scale, px, line_height, lines));
    }

    let (scale, px, line_height, mut lines) = last?;
    let truncated = lines.len() > max_lines;
    lines.truncate(max_lines);
    debug!("Caption did not fit at any scale, using {} with {} lines", scale, lines.len());

    Some(CaptionLayout {
        lines,
        scale,
        px,
        line_height,
        line_spacing: spacing,
        truncated,
    })
}
