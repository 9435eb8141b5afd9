//! Window sink
//!
//! Shows a highlight in a native window, looping animations until the
//! window is closed or Escape is pressed.

use image::RgbaImage;
use std::time::{Duration, Instant};
use tracing::info;

use super::{HighlightOutput, HighlightSink};
use crate::error::{LocatorError, Result};

/// Largest initial window size; bigger images are scaled down to fit
const MAX_WINDOW_SIZE: [f32; 2] = [1600.0, 1000.0];

/// Opens a window per highlight and blocks until it closes
#[derive(Debug, Clone)]
pub struct WindowSink {
    title: String,
}

impl WindowSink {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl Default for WindowSink {
    fn default() -> Self {
        Self::new("ShelfSpot")
    }
}

impl HighlightSink for WindowSink {
    fn present(&mut self, output: &HighlightOutput) -> Result<()> {
        let (frames, delay_ms) = match output {
            HighlightOutput::Still(img) => (vec![img.clone()], 0),
            HighlightOutput::Animation(anim) => {
                (anim.iter().cloned().collect(), anim.frame_delay_ms())
            }
        };
        let Some((width, height)) = output.dimensions() else {
            return Ok(());
        };

        let fit = (MAX_WINDOW_SIZE[0] / width as f32)
            .min(MAX_WINDOW_SIZE[1] / height as f32)
            .min(1.0);
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([width as f32 * fit, height as f32 * fit])
                .with_title(self.title.clone()),
            ..Default::default()
        };

        info!("Showing highlight in a window ({} frames)", frames.len());
        let app = HighlightViewer::new(frames, delay_ms);
        eframe::run_native(&self.title, options, Box::new(|_cc| Ok(Box::new(app))))
            .map_err(|e| LocatorError::Window(e.to_string()))
    }
}

/// eframe app that plays back highlight frames
struct HighlightViewer {
    frames: Vec<RgbaImage>,
    textures: Vec<Option<egui::TextureHandle>>,
    delay: Duration,
    started: Instant,
}

impl HighlightViewer {
    fn new(frames: Vec<RgbaImage>, delay_ms: u32) -> Self {
        let textures = frames.iter().map(|_| None).collect();
        Self {
            frames,
            textures,
            delay: Duration::from_millis(delay_ms.max(1) as u64),
            started: Instant::now(),
        }
    }

    fn current_index(&self) -> usize {
        if self.frames.len() <= 1 {
            return 0;
        }
        let elapsed = self.started.elapsed().as_millis();
        ((elapsed / self.delay.as_millis()) as usize) % self.frames.len()
    }

    fn texture(&mut self, ctx: &egui::Context, index: usize) -> Option<&egui::TextureHandle> {
        let frame = self.frames.get(index)?;
        let slot = self.textures.get_mut(index)?;
        if slot.is_none() {
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [frame.width() as usize, frame.height() as usize],
                frame.as_raw(),
            );
            *slot = Some(ctx.load_texture(
                format!("highlight_{}", index),
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
        slot.as_ref()
    }
}

impl eframe::App for HighlightViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let index = self.current_index();
        let animated = self.frames.len() > 1;
        let delay = self.delay;

        if let Some(texture) = self.texture(ctx, index).cloned() {
            egui::CentralPanel::default()
                .frame(egui::Frame::none().fill(egui::Color32::BLACK))
                .show(ctx, |ui| {
                    // Scale to fit while keeping the aspect ratio
                    let tex_size = texture.size_vec2();
                    let available = ui.available_size();
                    let scale = (available.x / tex_size.x).min(available.y / tex_size.y);
                    ui.centered_and_justified(|ui| {
                        ui.image((texture.id(), tex_size * scale));
                    });
                });
        }

        if animated {
            ctx.request_repaint_after(delay);
        }
    }
}
