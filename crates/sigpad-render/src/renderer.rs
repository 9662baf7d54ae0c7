//! Renderer trait abstraction.

use kurbo::{Point, Rect, Size};
use peniko::Color;
use sigpad_core::stroke::Mode;
use sigpad_core::surface::Surface;

/// Colors of the page chrome around the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageStyle {
    /// Page background (gray-50).
    pub background: Color,
    /// Card fill behind the surface.
    pub card: Color,
    /// Drop shadow under the card.
    pub card_shadow: Color,
    /// Surface border (gray-200).
    pub border: Color,
    /// Outline of the eraser footprint.
    pub eraser_ring: Color,
    /// Card corner radius.
    pub card_radius: f64,
    /// Surface border corner radius.
    pub surface_radius: f64,
    /// Surface border width.
    pub border_width: f64,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(249, 250, 251, 255),
            card: Color::WHITE,
            card_shadow: Color::from_rgba8(0, 0, 0, 40),
            border: Color::from_rgba8(229, 231, 235, 255),
            eraser_ring: Color::from_rgba8(59, 130, 246, 200), // Blue
            card_radius: 16.0,
            surface_radius: 12.0,
            border_width: 2.0,
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Page colors and radii.
    pub style: PageStyle,
    /// Card bounds in window coordinates.
    pub card_rect: Rect,
    /// Where the surface is displayed, in window coordinates.
    pub surface_rect: Rect,
    /// Surface pixels, if the pad is mounted.
    pub surface: Option<&'a Surface>,
    /// Current pen mode.
    pub mode: Mode,
    /// Pointer position in window coordinates, when over the surface.
    pub pointer: Option<Point>,
    /// Eraser stroke width, for the cursor ring.
    pub eraser_width: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(viewport_size: Size) -> Self {
        Self {
            viewport_size,
            scale_factor: 1.0,
            style: PageStyle::default(),
            card_rect: Rect::ZERO,
            surface_rect: Rect::ZERO,
            surface: None,
            mode: Mode::Draw,
            pointer: None,
            eraser_width: sigpad_core::stroke::ERASE_WIDTH as f64,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the page style.
    pub fn with_style(mut self, style: PageStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the card and surface placement.
    pub fn with_layout(mut self, card_rect: Rect, surface_rect: Rect) -> Self {
        self.card_rect = card_rect;
        self.surface_rect = surface_rect;
        self
    }

    /// Set the surface to display.
    pub fn with_surface(mut self, surface: Option<&'a Surface>) -> Self {
        self.surface = surface;
        self
    }

    /// Set the pen mode and eraser width.
    pub fn with_mode(mut self, mode: Mode, eraser_width: f64) -> Self {
        self.mode = mode;
        self.eraser_width = eraser_width;
        self
    }

    /// Set the pointer position.
    pub fn with_pointer(mut self, pointer: Option<Point>) -> Self {
        self.pointer = pointer;
        self
    }

    /// Whether the eraser footprint should be drawn this frame.
    pub fn shows_eraser_ring(&self) -> bool {
        self.mode == Mode::Erase
            && self.surface.is_some()
            && self.pointer.is_some_and(|p| self.surface_rect.contains(p))
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Color the frame is cleared to before the scene is drawn.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.style.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eraser_ring_visibility() {
        let surface = Surface::new(100, 50).unwrap();
        let rect = Rect::new(10.0, 10.0, 110.0, 60.0);
        let inside = Some(Point::new(50.0, 30.0));

        let ctx = RenderContext::new(Size::new(200.0, 100.0))
            .with_layout(rect.inflate(20.0, 20.0), rect)
            .with_surface(Some(&surface))
            .with_pointer(inside);
        assert!(!ctx.shows_eraser_ring());

        let ctx = ctx.with_mode(Mode::Erase, 20.0);
        assert!(ctx.shows_eraser_ring());

        let ctx = ctx.with_pointer(Some(Point::new(5.0, 5.0)));
        assert!(!ctx.shows_eraser_ring());

        let ctx = ctx.with_pointer(inside).with_surface(None);
        assert!(!ctx.shows_eraser_ring());
    }

    struct NoopRenderer;

    impl Renderer for NoopRenderer {
        fn build_scene(&mut self, _ctx: &RenderContext) {}
    }

    #[test]
    fn test_background_follows_page_style() {
        let ctx = RenderContext::new(Size::new(10.0, 10.0));
        assert_eq!(NoopRenderer.background_color(&ctx), PageStyle::default().background);

        let style = PageStyle {
            background: Color::from_rgba8(17, 24, 39, 255),
            ..Default::default()
        };
        let ctx = ctx.with_style(style);
        assert_eq!(NoopRenderer.background_color(&ctx), style.background);
    }
}
