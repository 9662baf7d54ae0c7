//! Page layout in logical pixels.

use kurbo::{Affine, Rect, Size};

/// Widest the content column gets.
pub const MAX_CONTENT_WIDTH: f64 = 768.0;
/// Horizontal page padding.
pub const PAGE_PADDING_X: f64 = 16.0;
/// Space above the header.
pub const PAGE_PADDING_TOP: f64 = 48.0;
/// Room reserved for the title and subtitle.
pub const HEADER_HEIGHT: f64 = 120.0;
/// Gap between header and card.
pub const HEADER_GAP: f64 = 32.0;
/// Inner padding of the card.
pub const CARD_PADDING: f64 = 24.0;
/// Border drawn around the surface.
pub const SURFACE_BORDER: f64 = 2.0;
/// Displayed surface height.
pub const SURFACE_HEIGHT: f64 = 256.0;
/// Gap between the surface and the button row.
pub const TOOLBAR_GAP: f64 = 16.0;
/// Button row height.
pub const TOOLBAR_HEIGHT: f64 = 40.0;

/// Placement of every page element for a given window size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub viewport: Size,
    pub header_rect: Rect,
    pub card_rect: Rect,
    /// Where the drawing surface is displayed (inside its border).
    pub surface_rect: Rect,
    pub toolbar_rect: Rect,
}

impl PageLayout {
    /// Lay out a centered column inside `viewport`.
    pub fn compute(viewport: Size) -> Self {
        let content_width = (viewport.width - PAGE_PADDING_X * 2.0).clamp(0.0, MAX_CONTENT_WIDTH);
        let x0 = ((viewport.width - content_width) / 2.0).max(0.0);
        let x1 = x0 + content_width;

        let header_rect = Rect::new(x0, PAGE_PADDING_TOP, x1, PAGE_PADDING_TOP + HEADER_HEIGHT);

        let card_y0 = header_rect.y1 + HEADER_GAP;
        let inner_x0 = x0 + CARD_PADDING;
        let inner_x1 = (x1 - CARD_PADDING).max(inner_x0);

        let surface_y0 = card_y0 + CARD_PADDING + SURFACE_BORDER;
        let surface_rect = Rect::new(
            inner_x0 + SURFACE_BORDER,
            surface_y0,
            (inner_x1 - SURFACE_BORDER).max(inner_x0 + SURFACE_BORDER),
            surface_y0 + SURFACE_HEIGHT,
        );

        let toolbar_y0 = surface_rect.y1 + SURFACE_BORDER + TOOLBAR_GAP;
        let toolbar_rect = Rect::new(inner_x0, toolbar_y0, inner_x1, toolbar_y0 + TOOLBAR_HEIGHT);

        let card_rect = Rect::new(x0, card_y0, x1, toolbar_rect.y1 + CARD_PADDING);

        Self {
            viewport,
            header_rect,
            card_rect,
            surface_rect,
            toolbar_rect,
        }
    }

    /// Surface size in whole pixels, as the pad should be mounted.
    pub fn surface_size(&self) -> (u32, u32) {
        (
            self.surface_rect.width().floor() as u32,
            self.surface_rect.height().floor() as u32,
        )
    }

    /// Convert to physical pixels for the renderer.
    pub fn to_physical(&self, scale_factor: f64) -> Self {
        let scale = Affine::scale(scale_factor);
        Self {
            viewport: Size::new(self.viewport.width * scale_factor, self.viewport.height * scale_factor),
            header_rect: scale.transform_rect_bbox(self.header_rect),
            card_rect: scale.transform_rect_bbox(self.card_rect),
            surface_rect: scale.transform_rect_bbox(self.surface_rect),
            toolbar_rect: scale.transform_rect_bbox(self.toolbar_rect),
        }
    }
}
