//! Frames for floating overlays.

use egui::{Color32, CornerRadius, Frame, Margin, Stroke};

use crate::{sizing, theme};

/// Dark rounded frame for transient status messages.
pub fn toast_frame() -> Frame {
    Frame::new()
        .fill(theme::TOAST_BG)
        .corner_radius(CornerRadius::same(sizing::CORNER_RADIUS))
        .stroke(Stroke::NONE)
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 6,
            offset: [0, 2],
            color: Color32::from_black_alpha(20),
        })
        .inner_margin(Margin::symmetric(12, 8))
}
