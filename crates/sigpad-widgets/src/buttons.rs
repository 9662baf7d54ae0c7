//! Button components: outline/primary action buttons and toggle buttons.

use egui::{Align2, Color32, CornerRadius, CursorIcon, Sense, Stroke, StrokeKind, Ui, vec2};

use crate::{sizing, theme};

/// Visual style of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    /// Gray border, transparent fill.
    #[default]
    Outline,
    /// Solid black fill with white text.
    Primary,
}

impl ButtonStyle {
    fn padding(self) -> f32 {
        match self {
            ButtonStyle::Outline => sizing::BUTTON_PADDING,
            ButtonStyle::Primary => sizing::PRIMARY_PADDING,
        }
    }

    /// Fill, border and text colors for the given interaction state.
    fn colors(self, selected: bool, hovered: bool) -> (Color32, Option<Color32>, Color32) {
        match self {
            ButtonStyle::Primary => {
                let fill = if hovered { theme::PRIMARY_HOVER } else { theme::PRIMARY };
                (fill, None, Color32::WHITE)
            }
            ButtonStyle::Outline if selected => {
                let fill = if hovered {
                    theme::SELECTED_HOVER_BG
                } else {
                    theme::SELECTED_BG
                };
                (fill, Some(theme::ACCENT), theme::ACCENT_TEXT)
            }
            ButtonStyle::Outline => {
                let fill = if hovered { theme::HOVER_BG } else { Color32::TRANSPARENT };
                (fill, Some(theme::BORDER), theme::TEXT)
            }
        }
    }
}

/// Width of a button holding text of `text_width`.
pub fn button_width(text_width: f32, padding: f32, min_width: Option<f32>) -> f32 {
    let natural = text_width + padding * 2.0;
    min_width.map_or(natural, |min| natural.max(min))
}

/// Paint a rounded text button and return true if clicked.
fn paint_button(
    ui: &mut Ui,
    label: &str,
    style: ButtonStyle,
    selected: bool,
    min_width: Option<f32>,
    tooltip: Option<&str>,
) -> bool {
    let font_id = egui::FontId::proportional(sizing::LABEL_SIZE);
    let galley = ui.painter().layout_no_wrap(
        label.to_string(),
        font_id.clone(),
        Color32::PLACEHOLDER, // Color doesn't matter for sizing
    );
    let width = button_width(galley.size().x, style.padding(), min_width);
    let (rect, response) = ui.allocate_exact_size(vec2(width, sizing::BUTTON_HEIGHT), Sense::click());

    if ui.is_rect_visible(rect) {
        let (fill, border, text_color) = style.colors(selected, response.hovered());
        let radius = CornerRadius::same(sizing::CORNER_RADIUS);
        ui.painter().rect_filled(rect, radius, fill);
        if let Some(border) = border {
            ui.painter()
                .rect_stroke(rect, radius, Stroke::new(1.0, border), StrokeKind::Inside);
        }
        ui.painter()
            .text(rect.center(), Align2::CENTER_CENTER, label, font_id, text_color);
    }

    let clicked = response.clicked();
    let response = match tooltip {
        Some(text) => response.on_hover_text(text),
        None => response,
    };
    response.on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

/// A text button that triggers an action.
pub struct ActionButton<'a> {
    label: &'a str,
    style: ButtonStyle,
    shortcut: Option<&'a str>,
    min_width: Option<f32>,
}

impl<'a> ActionButton<'a> {
    /// Create an outline button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            style: ButtonStyle::Outline,
            shortcut: None,
            min_width: None,
        }
    }

    /// Create a solid primary button.
    pub fn primary(label: &'a str) -> Self {
        Self {
            style: ButtonStyle::Primary,
            ..Self::new(label)
        }
    }

    /// Set keyboard shortcut (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        paint_button(ui, self.label, self.style, false, self.min_width, self.shortcut)
    }
}

/// An outline button that stays highlighted in blue while selected.
pub struct ToggleButton<'a> {
    label: &'a str,
    selected: bool,
    shortcut: Option<&'a str>,
    min_width: Option<f32>,
}

impl<'a> ToggleButton<'a> {
    /// Create a new toggle button.
    pub fn new(label: &'a str, selected: bool) -> Self {
        Self {
            label,
            selected,
            shortcut: None,
            min_width: None,
        }
    }

    /// Set keyboard shortcut (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        paint_button(
            ui,
            self.label,
            ButtonStyle::Outline,
            self.selected,
            self.min_width,
            self.shortcut,
        )
    }
}
