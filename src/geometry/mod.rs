//! Region Geometry
//!
//! Normalized (0.0-1.0) book regions and their conversion to pixel
//! coordinates on a concrete image, plus the derived text and caption boxes
//! used by the highlight renderer.

use serde::{Deserialize, Serialize};

use crate::error::{LocatorError, Result};

/// Axis-aligned box in normalized coordinates, stored as center + size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct NormBox {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormBox {
    /// Create a box from its center and size
    pub fn new(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            center_x,
            center_y,
            width,
            height,
        }
    }

    /// Create a box from its normalized corner extents
    pub fn from_extents(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Left, top, right, bottom edges
    pub fn extents(&self) -> (f32, f32, f32, f32) {
        (
            self.center_x - self.width / 2.0,
            self.center_y - self.height / 2.0,
            self.center_x + self.width / 2.0,
            self.center_y + self.height / 2.0,
        )
    }

    /// Reject NaN/infinite values and negative sizes
    pub fn validate(&self) -> Result<()> {
        let values = [self.center_x, self.center_y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LocatorError::InvalidRegion(format!(
                "box has non-finite values: {:?}",
                values
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(LocatorError::InvalidRegion(format!(
                "box has negative size: {} x {}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl From<[f32; 4]> for NormBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<NormBox> for [f32; 4] {
    fn from(b: NormBox) -> Self {
        [b.center_x, b.center_y, b.width, b.height]
    }
}

/// A point in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

impl NormPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for NormPoint {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<NormPoint> for [f32; 2] {
    fn from(p: NormPoint) -> Self {
        [p.x, p.y]
    }
}

/// Four corner points outlining a (possibly rotated) book spine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NormPoint>", into = "Vec<NormPoint>")]
pub struct Quad {
    pub points: [NormPoint; 4],
}

impl Quad {
    pub fn new(points: [NormPoint; 4]) -> Self {
        Self { points }
    }

    /// Build a quad from a point list, which must hold exactly 4 points
    pub fn from_points(points: &[(f32, f32)]) -> Result<Self> {
        let points: Vec<NormPoint> = points.iter().map(|&(x, y)| NormPoint::new(x, y)).collect();
        Self::try_from(points)
    }

    /// Axis-aligned bounding box of the four points
    pub fn bounding_box(&self) -> NormBox {
        let min_x = self.points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let min_y = self.points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_x = self.points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let max_y = self.points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        NormBox::from_extents(min_x, min_y, max_x, max_y)
    }

    /// Reject NaN/infinite coordinates
    pub fn validate(&self) -> Result<()> {
        if self.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(LocatorError::InvalidRegion(format!(
                "quad has non-finite points: {:?}",
                self.points
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<NormPoint>> for Quad {
    type Error = LocatorError;

    fn try_from(points: Vec<NormPoint>) -> Result<Self> {
        let count = points.len();
        let points: [NormPoint; 4] = points.try_into().map_err(|_| {
            LocatorError::InvalidRegion(format!("quad needs 4 points, got {}", count))
        })?;
        Ok(Self { points })
    }
}

impl From<Quad> for Vec<NormPoint> {
    fn from(q: Quad) -> Self {
        q.points.to_vec()
    }
}

/// A normalized highlight region
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    Box(NormBox),
    Quad(Quad),
}

impl Region {
    /// Axis-aligned bounding box of the region
    pub fn bounding_box(&self) -> NormBox {
        match self {
            Region::Box(b) => *b,
            Region::Quad(q) => q.bounding_box(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Region::Box(b) => b.validate(),
            Region::Quad(q) => q.validate(),
        }
    }
}

/// Axis-aligned box in pixel coordinates (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Quadrilateral in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPolygon {
    pub points: [(f32, f32); 4],
}

impl PixelPolygon {
    /// Bounding box of the polygon, clipped to the image
    pub fn bounds(&self, image_width: u32, image_height: u32) -> PixelBox {
        let min_x = self.points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let min_y = self.points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_x = self.points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let max_y = self.points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        clamp_box(
            min_x.floor(),
            min_y.floor(),
            max_x.ceil() - min_x.floor(),
            max_y.ceil() - min_y.floor(),
            image_width,
            image_height,
        )
    }
}

/// A region resolved against a concrete image size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelRegion {
    Box(PixelBox),
    Polygon(PixelPolygon),
}

impl PixelRegion {
    /// Axis-aligned bounds, clipped to the image
    pub fn bounds(&self, image_width: u32, image_height: u32) -> PixelBox {
        match self {
            PixelRegion::Box(b) => *b,
            PixelRegion::Polygon(p) => p.bounds(image_width, image_height),
        }
    }
}

/// Resolve a normalized region against an image of the given size
///
/// Boxes are clamped so they never extend past the image; quad points are
/// scaled as-is.
pub fn to_pixel_region(
    region: &Region,
    image_width: u32,
    image_height: u32,
) -> Result<PixelRegion> {
    region.validate()?;
    if image_width == 0 || image_height == 0 {
        return Err(LocatorError::InvalidRegion(format!(
            "image has zero size: {} x {}",
            image_width, image_height
        )));
    }

    let (w, h) = (image_width as f32, image_height as f32);
    match region {
        Region::Box(b) => {
            let pw = b.width * w;
            let ph = b.height * h;
            let left = b.center_x * w - pw / 2.0;
            let top = b.center_y * h - ph / 2.0;
            Ok(PixelRegion::Box(clamp_box(left, top, pw, ph, image_width, image_height)))
        }
        Region::Quad(q) => {
            let points = q.points.map(|p| (p.x * w, p.y * h));
            Ok(PixelRegion::Polygon(PixelPolygon { points }))
        }
    }
}

/// Clamp a floating-point box into an image
///
/// The top-left corner is clamped to [0, dim - 1] and the size is cut so the
/// box ends at the image edge at the latest.
pub fn clamp_box(
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    image_width: u32,
    image_height: u32,
) -> PixelBox {
    let max_x = image_width.saturating_sub(1) as f32;
    let max_y = image_height.saturating_sub(1) as f32;

    let x = left.round().clamp(0.0, max_x) as u32;
    let y = top.round().clamp(0.0, max_y) as u32;
    let width = (width.round().max(0.0) as u32).min(image_width - x);
    let height = (height.round().max(0.0) as u32).min(image_height - y);

    PixelBox { x, y, width, height }
}

/// Shrink a box to the part that usually carries the title text
///
/// The result keeps `ratio` of the width and height, stays centered
/// horizontally and sits one third of the slack below the top edge.
pub fn text_subregion(area: PixelBox, ratio: f32, image_width: u32, image_height: u32) -> PixelBox {
    let ratio = if ratio.is_finite() { ratio.clamp(0.05, 1.0) } else { 1.0 };
    let text_w = area.width as f32 * ratio;
    let text_h = area.height as f32 * ratio;
    let left = area.x as f32 + (area.width as f32 - text_w) / 2.0;
    let top = area.y as f32 + (area.height as f32 - text_h) / 3.0;
    clamp_box(left, top, text_w, text_h, image_width, image_height)
}

/// Place a fixed-size caption box above an anchor box
///
/// The caption is centered horizontally on the anchor, `gap` pixels above
/// it, and shifted (or shrunk, for tiny images) to stay inside the image.
pub fn caption_box(
    anchor: PixelBox,
    box_width: u32,
    box_height: u32,
    gap: u32,
    image_width: u32,
    image_height: u32,
) -> PixelBox {
    let width = box_width.min(image_width);
    let height = box_height.min(image_height);

    let (center_x, _) = anchor.center();
    let left = center_x - width as f32 / 2.0;
    let top = anchor.y as f32 - gap as f32 - height as f32;

    let x = left.round().clamp(0.0, (image_width - width) as f32) as u32;
    let y = top.round().clamp(0.0, (image_height - height) as f32) as u32;

    PixelBox { x, y, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_quad() -> Quad {
        Quad::from_points(&[(0.3829, 0.2582), (0.4177, 0.2567), (0.4048, 0.4725), (0.3790, 0.4732)])
            .unwrap()
    }

    #[test]
    fn test_box_to_pixels() {
        let region = Region::Box(NormBox::new(0.5, 0.5, 0.2, 0.4));
        let pixel = to_pixel_region(&region, 1000, 500).unwrap();

        assert_eq!(pixel, PixelRegion::Box(PixelBox::new(400, 150, 200, 200)));
    }

    #[test]
    fn test_box_center_is_scale_consistent() {
        // Boxes fully inside the image; clamping moves the center of the rest
        let boxes = [
            NormBox::new(0.1794, 0.3617, 0.2181, 0.2169),
            NormBox::new(0.5020, 0.3672, 0.0297, 0.2245),
            NormBox::new(0.8517, 0.7303, 0.0625, 0.0513),
        ];
        let sizes = [(1920, 1080), (640, 480), (4032, 3024), (333, 777)];

        for b in boxes {
            for (w, h) in sizes {
                let pixel = to_pixel_region(&Region::Box(b), w, h).unwrap();
                let PixelRegion::Box(pb) = pixel else {
                    panic!("box region resolved to polygon");
                };
                let (cx, cy) = pb.center();
                assert!((cx / w as f32 - b.center_x).abs() <= 1.0 / w as f32);
                assert!((cy / h as f32 - b.center_y).abs() <= 1.0 / h as f32);
            }
        }
    }

    #[test]
    fn test_clamped_box_center_shifts_inward() {
        let b = NormBox::new(0.95, 0.5, 0.2, 0.2);
        let pixel = to_pixel_region(&Region::Box(b), 1000, 1000).unwrap();
        let pb = pixel.bounds(1000, 1000);

        assert_eq!(pb, PixelBox::new(850, 400, 150, 200));
        let (cx, _) = pb.center();
        assert!(cx / 1000.0 < b.center_x);
    }

    #[test]
    fn test_out_of_bounds_box_is_clamped() {
        let cases = [
            NormBox::new(0.98, 0.5, 0.3, 0.3),
            NormBox::new(0.0, 0.0, 0.5, 0.5),
            NormBox::new(1.2, 1.3, 0.4, 0.4),
            NormBox::new(-0.5, 0.5, 0.2, 2.0),
        ];

        for b in cases {
            let pixel = to_pixel_region(&Region::Box(b), 800, 600).unwrap();
            let pb = pixel.bounds(800, 600);
            assert!(pb.x < 800 && pb.y < 600);
            assert!(pb.right() <= 800);
            assert!(pb.bottom() <= 600);
        }
    }

    #[test]
    fn test_quad_scales_without_clamping() {
        let quad = Quad::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap();
        let pixel = to_pixel_region(&Region::Quad(quad), 200, 100).unwrap();

        let PixelRegion::Polygon(poly) = pixel else {
            panic!("quad resolved to box");
        };
        assert_eq!(poly.points, [(0.0, 0.0), (200.0, 0.0), (200.0, 100.0), (0.0, 100.0)]);
    }

    #[test]
    fn test_quad_bounding_box_matches_min_max() {
        let quad = sample_quad();
        let bbox = quad.bounding_box();

        let xs: Vec<f32> = quad.points.iter().map(|p| p.x).collect();
        let ys: Vec<f32> = quad.points.iter().map(|p| p.y).collect();
        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        let (left, top, right, bottom) = bbox.extents();
        assert!((left - min_x).abs() < 1e-6);
        assert!((top - min_y).abs() < 1e-6);
        assert!((right - max_x).abs() < 1e-6);
        assert!((bottom - max_y).abs() < 1e-6);

        // A box-only consumer sees the same rectangle
        assert_eq!(Region::Quad(quad).bounding_box(), bbox);
    }

    #[test]
    fn test_quad_wrong_point_count() {
        let result = Quad::from_points(&[(0.1, 0.1), (0.2, 0.1), (0.2, 0.2)]);
        assert!(matches!(result, Err(LocatorError::InvalidRegion(_))));
    }

    #[test]
    fn test_nan_region_rejected() {
        let region = Region::Box(NormBox::new(f32::NAN, 0.5, 0.1, 0.1));
        assert!(matches!(
            to_pixel_region(&region, 100, 100),
            Err(LocatorError::InvalidRegion(_))
        ));

        let quad =
            Quad::from_points(&[(0.1, 0.1), (0.2, f32::INFINITY), (0.2, 0.2), (0.1, 0.2)]).unwrap();
        assert!(to_pixel_region(&Region::Quad(quad), 100, 100).is_err());
    }

    #[test]
    fn test_negative_size_rejected() {
        let region = Region::Box(NormBox::new(0.5, 0.5, -0.1, 0.1));
        assert!(to_pixel_region(&region, 100, 100).is_err());
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let region = Region::Box(NormBox::new(0.5, 0.5, 0.1, 0.1));
        assert!(to_pixel_region(&region, 0, 100).is_err());
    }

    #[test]
    fn test_text_subregion() {
        let area = PixelBox::new(100, 100, 200, 300);
        let text = text_subregion(area, 0.65, 1000, 1000);

        assert_eq!(text.width, 130);
        assert_eq!(text.height, 195);
        // Centered horizontally: (200 - 130) / 2 = 35
        assert_eq!(text.x, 135);
        // One third of the vertical slack: (300 - 195) / 3 = 35
        assert_eq!(text.y, 135);
    }

    #[test]
    fn test_caption_box_above_anchor() {
        let anchor = PixelBox::new(900, 500, 100, 200);
        let caption = caption_box(anchor, 600, 180, 10, 1920, 1080);

        assert_eq!(caption.width, 600);
        assert_eq!(caption.height, 180);
        assert_eq!(caption.x, 650);
        assert_eq!(caption.y, 310);
    }

    #[test]
    fn test_caption_box_clamped_to_image() {
        // Anchor in the top-left corner: caption cannot go above or left
        let anchor = PixelBox::new(5, 20, 40, 40);
        let caption = caption_box(anchor, 600, 180, 10, 800, 600);
        assert_eq!(caption.x, 0);
        assert_eq!(caption.y, 0);

        // Image smaller than the caption box
        let caption = caption_box(anchor, 600, 180, 10, 300, 100);
        assert_eq!((caption.x, caption.y, caption.width, caption.height), (0, 0, 300, 100));
    }

    #[test]
    fn test_polygon_bounds() {
        let poly = PixelPolygon {
            points: [(10.2, 5.0), (50.7, 8.0), (45.0, 90.5), (8.9, 88.0)],
        };
        let bounds = poly.bounds(100, 100);
        assert_eq!(bounds, PixelBox::new(8, 5, 43, 86));
    }

    #[test]
    fn test_norm_box_serde_as_array() {
        let b = NormBox::new(0.25, 0.5, 0.1, 0.2);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[0.25,0.5,0.1,0.2]");

        let quad: Quad = serde_json::from_str("[[0.1,0.1],[0.2,0.1],[0.2,0.2],[0.1,0.2]]").unwrap();
        assert_eq!(quad.points[2], NormPoint::new(0.2, 0.2));

        let bad: std::result::Result<Quad, _> = serde_json::from_str("[[0.1,0.1],[0.2,0.1]]");
        assert!(bad.is_err());
    }
}
