//! Application Configuration
//!
//! Display settings and file locations stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Highlight compositing settings
    pub highlight: HighlightSettings,
    /// Caption box settings
    pub caption: CaptionSettings,
    /// Animated highlight settings
    pub animation: AnimationSettings,
}

/// General application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Catalog file; defaults to `catalog.json` in the data directory
    pub catalog_path: Option<PathBuf>,
    /// Reference photo of the shelf
    pub reference_image: Option<PathBuf>,
    /// Where rendered highlights are written when no output is given
    pub output_dir: Option<PathBuf>,
}

/// How the matched region is lit up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Fraction of brightness kept outside the highlight (0.0 - 1.0)
    pub dim_keep: f32,
    /// Blend toward white inside the highlight (0.0 - 1.0)
    pub white_blend: f32,
    /// Border color (RGB)
    pub border_color: [u8; 3],
    /// Border thickness in pixels
    pub border_thickness: u32,
    /// Only light up the title area of box regions
    pub text_only: bool,
    /// Share of a box's width/height kept by the title area
    pub text_ratio: f32,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            dim_keep: 0.4,
            white_blend: 0.6,
            border_color: [255, 200, 0],
            border_thickness: 4,
            text_only: true,
            text_ratio: 0.65,
        }
    }
}

/// Caption box showing the book title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// Draw the caption at all
    pub enabled: bool,
    /// Caption box width in pixels
    pub box_width: u32,
    /// Caption box height in pixels
    pub box_height: u32,
    /// Font scales tried in order until the text fits
    pub font_scales: Vec<f32>,
    /// Maximum number of wrapped lines
    pub max_lines: usize,
    /// Extra space between lines in pixels
    pub line_spacing: u32,
    /// Inner padding of the caption box in pixels
    pub padding: u32,
    /// Gap between the caption box and the highlighted region
    pub gap: u32,
    /// TrueType/OpenType font file; common system fonts are tried if unset
    pub font_path: Option<PathBuf>,
    /// Caption text color (RGB)
    pub text_color: [u8; 3],
    /// Caption box fill color (RGB)
    pub background_color: [u8; 3],
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            box_width: 600,
            box_height: 180,
            font_scales: vec![1.5, 1.3, 1.1, 1.0, 0.9, 0.8, 0.7, 0.6],
            max_lines: 3,
            line_spacing: 8,
            padding: 15,
            gap: 12,
            font_path: None,
            text_color: [255, 255, 255],
            background_color: [0, 0, 0],
        }
    }
}

/// Pulsing highlight animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Number of frames in one pulse
    pub frames: usize,
    /// Delay between frames in milliseconds
    pub frame_delay_ms: u32,
    /// Lowest highlight intensity within the pulse (0.0 - 1.0)
    pub min_intensity: f32,
    /// How far the glow outline grows at the peak, in pixels
    pub glow_radius: f32,
    /// Gaussian blur sigma of the glow
    pub glow_sigma: f32,
    /// Glow color (RGB)
    pub glow_color: [u8; 3],
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            frames: 24,
            frame_delay_ms: 60,
            min_intensity: 0.45,
            glow_radius: 18.0,
            glow_sigma: 6.0,
            glow_color: [255, 240, 180],
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
