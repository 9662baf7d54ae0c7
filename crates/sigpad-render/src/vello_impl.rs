//! Vello-based renderer implementation.

use crate::renderer::{PageStyle, RenderContext, Renderer};
use kurbo::{Affine, Circle, Rect, RoundedRect, Stroke};
use peniko::Fill;
use sigpad_core::surface::Surface;
use std::sync::Arc;
use vello::Scene;

/// Card shadow blur.
const SHADOW_STD_DEV: f64 = 12.0;
/// Card shadow vertical offset.
const SHADOW_OFFSET: f64 = 6.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Last uploaded surface image, keyed by surface revision.
    image_cache: Option<(u64, peniko::ImageData)>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            image_cache: None,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Image data for the surface, converting only when its revision changed.
    fn surface_image(&mut self, surface: &Surface) -> peniko::ImageData {
        if let Some((revision, image)) = &self.image_cache {
            if *revision == surface.revision() {
                return image.clone();
            }
        }

        let image = peniko::ImageData {
            data: peniko::Blob::new(Arc::new(surface.to_rgba8())),
            format: peniko::ImageFormat::Rgba8,
            width: surface.width(),
            height: surface.height(),
            alpha_type: peniko::ImageAlphaType::Alpha,
        };
        self.image_cache = Some((surface.revision(), image.clone()));
        image
    }

    /// Render the card with its drop shadow.
    fn render_card(&mut self, rect: Rect, style: &PageStyle) {
        self.scene.draw_blurred_rounded_rect(
            Affine::translate((0.0, SHADOW_OFFSET)),
            rect,
            style.card_shadow,
            style.card_radius,
            SHADOW_STD_DEV,
        );
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            style.card,
            None,
            &RoundedRect::from_rect(rect, style.card_radius),
        );
    }

    /// Render the surface pixels stretched over the display rectangle.
    ///
    /// The buffer keeps its mount-time size, so if the display area changed
    /// since then the image is scaled to fit, like a CSS-sized canvas.
    fn render_surface(&mut self, surface: &Surface, rect: Rect) {
        let image = self.surface_image(surface);
        let scale_x = rect.width() / image.width as f64;
        let scale_y = rect.height() / image.height as f64;

        let transform =
            Affine::translate((rect.x0, rect.y0)) * Affine::scale_non_uniform(scale_x, scale_y);
        self.scene.draw_image(&Into::<peniko::ImageBrush>::into(image), transform);
    }

    /// Render the border around the surface.
    fn render_border(&mut self, rect: Rect, style: &PageStyle) {
        let half = style.border_width / 2.0;
        let outline = RoundedRect::from_rect(rect.inflate(half, half), style.surface_radius);
        self.scene.stroke(
            &Stroke::new(style.border_width),
            Affine::IDENTITY,
            style.border,
            None,
            &outline,
        );
    }

    /// Outline the area the eraser will clear around the pointer.
    fn render_eraser_ring(&mut self, ctx: &RenderContext) {
        let Some(pointer) = ctx.pointer else {
            return;
        };
        let circle = Circle::new(pointer, ctx.eraser_width / 2.0);
        self.scene.stroke(
            &Stroke::new(1.0),
            Affine::IDENTITY,
            ctx.style.eraser_ring,
            None,
            &circle,
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        // Clear the scene
        self.scene.reset();

        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, ctx.style.background, None, &viewport);

        if ctx.card_rect.area() > 0.0 {
            self.render_card(ctx.card_rect, &ctx.style);
        }

        if ctx.surface_rect.area() > 0.0 {
            if let Some(surface) = ctx.surface {
                self.render_surface(surface, ctx.surface_rect);
            }
            self.render_border(ctx.surface_rect, &ctx.style);
        }

        if ctx.shows_eraser_ring() {
            self.render_eraser_ring(ctx);
        }
    }
}
