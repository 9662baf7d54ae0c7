//! Raster drawing surface.

use crate::stroke::StrokeParams;
use kurbo::{Point, Size};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tiny_skia::{FillRule, PathBuilder, Pixmap, Transform};

/// Surface errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Invalid surface size: {0}x{1}")]
    InvalidSize(u32, u32),
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// A fixed-size RGBA raster buffer, initially fully transparent.
///
/// Pixels are stored premultiplied. Every mutation assigns a new `revision`
/// so renderers can tell when a cached upload is stale. Revisions are unique
/// across all surfaces in the process.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
    revision: u64,
}

impl Surface {
    /// Allocate a blank surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize(width, height))?;
        Ok(Self {
            pixmap,
            revision: next_revision(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Size in device pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }

    /// Stamp of the latest mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Erase every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.revision = next_revision();
    }

    /// Stroke a straight segment from `from` to `to`.
    ///
    /// A zero-length segment leaves a round dot of the stroke width, the same
    /// as a round-capped canvas stroke would.
    pub fn stroke_segment(&mut self, from: Point, to: Point, params: &StrokeParams) {
        let paint = params.paint();

        if from == to {
            let Some(dot) =
                PathBuilder::from_circle(from.x as f32, from.y as f32, params.width / 2.0)
            else {
                return;
            };
            self.pixmap
                .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
        } else {
            let mut pb = PathBuilder::new();
            pb.move_to(from.x as f32, from.y as f32);
            pb.line_to(to.x as f32, to.y as f32);
            let Some(path) = pb.finish() else {
                return;
            };
            self.pixmap
                .stroke_path(&path, &paint, &params.stroke(), Transform::identity(), None);
        }

        self.revision = next_revision();
    }

    /// Premultiplied pixel at `(x, y)`.
    ///
    /// `Pixmap::pixel` only checks the linear index, so a column past the
    /// right edge would land on the next row.
    fn premultiplied(&self, x: u32, y: u32) -> Option<tiny_skia::PremultipliedColorU8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap.pixel(x, y)
    }

    /// Non-premultiplied RGBA of a pixel, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.premultiplied(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Alpha of a pixel (0 when out of bounds).
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.premultiplied(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixel_count(&self) -> usize {
        self.pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    /// Copy out the pixels as non-premultiplied RGBA8, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixmap.pixels().len() * 4);
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        rgba
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Mode, StrokeParams};

    #[test]
    fn test_new_surface_is_blank() {
        let surface = Surface::new(64, 32).unwrap();
        assert_eq!(surface.width(), 64);
        assert_eq!(surface.height(), 32);
        assert!(surface.is_blank());
    }

    #[test]
    fn test_revisions_are_unique() {
        let a = Surface::new(8, 8).unwrap();
        let b = Surface::new(8, 8).unwrap();
        assert_ne!(a.revision(), b.revision());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(Surface::new(0, 10).unwrap_err(), SurfaceError::InvalidSize(0, 10));
        assert_eq!(Surface::new(10, 0).unwrap_err(), SurfaceError::InvalidSize(10, 0));
    }

    #[test]
    fn test_stroke_segment_paints_along_line() {
        let mut surface = Surface::new(64, 32).unwrap();
        let initial = surface.revision();
        let params = StrokeParams::for_mode(Mode::Draw);
        surface.stroke_segment(Point::new(10.0, 10.0), Point::new(50.0, 10.0), &params);

        assert!(surface.alpha(30, 10) > 0);
        assert_eq!(surface.pixel(30, 10).unwrap()[0], 0); // black
        assert_eq!(surface.alpha(30, 20), 0);
        assert!(surface.revision() > initial);
    }

    #[test]
    fn test_zero_length_segment_leaves_dot() {
        let mut surface = Surface::new(32, 32).unwrap();
        let params = StrokeParams::for_mode(Mode::Draw);
        surface.stroke_segment(Point::new(16.0, 16.0), Point::new(16.0, 16.0), &params);

        assert!(!surface.is_blank());
        assert_eq!(surface.alpha(2, 2), 0);
    }

    #[test]
    fn test_clear_erases_everything() {
        let mut surface = Surface::new(32, 32).unwrap();
        let params = StrokeParams::for_mode(Mode::Draw);
        surface.stroke_segment(Point::new(0.0, 0.0), Point::new(31.0, 31.0), &params);
        assert!(!surface.is_blank());
        let drawn = surface.revision();

        surface.clear();
        assert!(surface.is_blank());
        assert!(surface.revision() > drawn);
    }

    #[test]
    fn test_rgba_export_length() {
        let surface = Surface::new(7, 5).unwrap();
        let rgba = surface.to_rgba8();
        assert_eq!(rgba.len(), 7 * 5 * 4);
        assert!(rgba.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let surface = Surface::new(4, 4).unwrap();
        assert_eq!(surface.pixel(4, 0), None);
        assert_eq!(surface.alpha(0, 4), 0);
    }

    #[test]
    fn test_column_past_edge_does_not_wrap() {
        let mut surface = Surface::new(8, 8).unwrap();
        let params = StrokeParams::for_mode(Mode::Draw);
        // Paint the start of row 1, which x = 8 on row 0 would alias
        surface.stroke_segment(Point::new(0.0, 1.5), Point::new(3.0, 1.5), &params);
        assert!(surface.alpha(0, 1) > 0);

        assert_eq!(surface.pixel(8, 0), None);
        assert_eq!(surface.alpha(8, 0), 0);
        assert_eq!(surface.alpha(9, 0), 0);
    }
}
