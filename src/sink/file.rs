//! Image file sink
//!
//! Stills are written in the format implied by the file extension.
//! Animations go to an endlessly looping GIF.

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{HighlightOutput, HighlightSink};
use crate::error::Result;

/// Writes highlights to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default()
    }
}

impl HighlightSink for FileSink {
    fn present(&mut self, output: &HighlightOutput) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let is_gif = self.extension() == "gif";
        match output {
            HighlightOutput::Still(img) if is_gif => {
                write_gif(&self.path, std::slice::from_ref(img), 0)?
            }
            HighlightOutput::Still(img) => write_still(&self.path, img)?,
            HighlightOutput::Animation(anim) if is_gif => {
                let frames: Vec<RgbaImage> = anim.iter().cloned().collect();
                write_gif(&self.path, &frames, anim.frame_delay_ms())?;
            }
            HighlightOutput::Animation(anim) => {
                // Only GIF holds frames; keep the brightest one
                warn!("{:?} is not a GIF, writing a single animation frame", self.path);
                if let Some(peak) = anim.frame(anim.len() / 2) {
                    write_still(&self.path, peak)?;
                }
            }
        }

        info!("Wrote highlight to {:?}", self.path);
        Ok(())
    }
}

fn write_still(path: &Path, img: &RgbaImage) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase());
    match ext.as_deref() {
        // JPEG has no alpha channel
        Some("jpg") | Some("jpeg") => DynamicImage::ImageRgba8(img.clone()).to_rgb8().save(path)?,
        _ => img.save(path)?,
    }
    Ok(())
}

fn write_gif(path: &Path, frames: &[RgbaImage], delay_ms: u32) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    encoder.encode_frames(frames.iter().map(|f| Frame::from_parts(f.clone(), 0, 0, delay)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HighlightAnimation;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};
    use std::io::BufReader;
    use tempfile::tempdir;

    fn solid(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(12, 8, Rgba([value, value, value, 255]))
    }

    fn gif_frame_count(path: &Path) -> usize {
        let decoder = GifDecoder::new(BufReader::new(File::open(path).unwrap())).unwrap();
        decoder.into_frames().collect_frames().unwrap().len()
    }

    #[test]
    fn test_still_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("highlight.png");
        let mut sink = FileSink::new(&path);

        sink.present(&HighlightOutput::Still(solid(50))).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 12);
        assert_eq!(img.height(), 8);
    }

    #[test]
    fn test_still_jpeg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highlight.JPG");
        FileSink::new(&path).present(&HighlightOutput::Still(solid(50))).unwrap();
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_animation_gif() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pulse.gif");
        let anim = HighlightAnimation::new(vec![solid(10), solid(120), solid(240)], 60);

        FileSink::new(&path).present(&HighlightOutput::Animation(anim)).unwrap();

        assert_eq!(gif_frame_count(&path), 3);
    }

    #[test]
    fn test_still_to_gif_is_single_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("still.gif");
        FileSink::new(&path).present(&HighlightOutput::Still(solid(90))).unwrap();
        assert_eq!(gif_frame_count(&path), 1);
    }

    #[test]
    fn test_animation_to_png_writes_peak_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pulse.png");
        let anim = HighlightAnimation::new(vec![solid(10), solid(240), solid(120)], 60);

        FileSink::new(&path).present(&HighlightOutput::Animation(anim)).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0), &Rgba([240, 240, 240, 255]));
    }
}
