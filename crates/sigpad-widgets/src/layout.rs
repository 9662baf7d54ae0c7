//! Layout helpers: page header and hints.

use egui::{RichText, Ui};

use crate::theme;

/// Heading size (text-4xl).
pub const TITLE_SIZE: f32 = 36.0;
/// Subtitle size (text-lg).
pub const SUBTITLE_SIZE: f32 = 18.0;

/// Centered bold title with a muted, wrapping subtitle below it.
pub fn page_header(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(title)
                .size(TITLE_SIZE)
                .strong()
                .color(theme::TEXT),
        );
        ui.add_space(16.0);
        ui.label(
            RichText::new(subtitle)
                .size(SUBTITLE_SIZE)
                .color(theme::TEXT_MUTED),
        );
    });
}

/// Small muted line listing keyboard shortcuts.
pub fn shortcut_hint(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(12.0).color(theme::TEXT_MUTED));
}
