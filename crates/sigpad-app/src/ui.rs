//! UI components using egui.

use egui::{Align, Align2, Color32, Context, CursorIcon, Id, Layout, Pos2, RichText, Vec2};
use sigpad_core::export::{ExportReport, SaveOutcome};
use sigpad_widgets::{ActionButton, ToggleButton, page_header, shortcut_hint, toast_frame};
use web_time::{Duration, Instant};

use crate::layout::PageLayout;
use crate::shortcuts::ShortcutRegistry;

/// Page title.
pub const TITLE: &str = "Beautiful Digital Signatures";
/// Page subtitle.
pub const SUBTITLE: &str = "Create, customize, and download your digital signature with our elegant and easy-to-use signature tool.";

/// How long a status message stays up.
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Actions that can be triggered by UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Erase the whole pad.
    Clear,
    /// Switch between pen and eraser.
    ToggleEraser,
    /// Export the pad as PNG.
    Download,
}

/// Transient message shown after an export.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// UI state that persists across frames.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Whether the eraser button is highlighted (mirrors the pad mode).
    pub eraser_active: bool,
    /// Current status message, if any.
    pub status: Option<StatusMessage>,
}

impl UiState {
    /// Show the outcome of an export.
    pub fn show_report(&mut self, report: &ExportReport) {
        let (text, is_error) = match report.destination() {
            Some(dest) => (format!("Saved to {}", dest), false),
            None => match report.fallback.as_ref().unwrap_or(&report.primary) {
                SaveOutcome::Failed(e) => (format!("Download failed: {}", e), true),
                _ => ("Download unavailable".to_string(), true),
            },
        };
        self.show_status(text, is_error);
    }

    pub fn show_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    /// Drop the status message once it has been up long enough.
    pub fn expire_status(&mut self, now: Instant) {
        if self
            .status
            .as_ref()
            .is_some_and(|status| now.duration_since(status.shown_at) >= STATUS_DURATION)
        {
            self.status = None;
        }
    }
}

/// Render the UI and return any action triggered.
pub fn render_ui(
    ctx: &Context,
    ui_state: &mut UiState,
    layout: &PageLayout,
    surface_hovered: bool,
) -> Option<UiAction> {
    if surface_hovered {
        ctx.set_cursor_icon(CursorIcon::Crosshair);
    }

    render_header(ctx, layout);
    let action = render_toolbar(ctx, ui_state, layout);
    render_hint(ctx, layout);

    ui_state.expire_status(Instant::now());
    render_status(ctx, ui_state);

    action
}

fn to_pos(point: kurbo::Point) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}

/// Render the title and subtitle above the card.
fn render_header(ctx: &Context, layout: &PageLayout) {
    let rect = layout.header_rect;
    egui::Area::new(Id::new("header"))
        .fixed_pos(to_pos(rect.origin()))
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_width(rect.width() as f32);
            page_header(ui, TITLE, SUBTITLE);
        });
}

/// Render the Clear / Eraser / Download row inside the card.
fn render_toolbar(ctx: &Context, ui_state: &UiState, layout: &PageLayout) -> Option<UiAction> {
    let mut action = None;
    let rect = layout.toolbar_rect;
    let clear_hint = ShortcutRegistry::label_for(UiAction::Clear);
    let eraser_hint = ShortcutRegistry::label_for(UiAction::ToggleEraser);
    let download_hint = ShortcutRegistry::label_for(UiAction::Download);

    egui::Area::new(Id::new("toolbar"))
        .fixed_pos(to_pos(rect.origin()))
        .show(ctx, |ui| {
            ui.set_width(rect.width() as f32);
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(sigpad_widgets::sizing::BUTTON_GAP, 0.0);

                let mut clear = ActionButton::new("Clear");
                if let Some(hint) = clear_hint.as_deref() {
                    clear = clear.shortcut(hint);
                }
                if clear.show(ui) {
                    action = Some(UiAction::Clear);
                }

                let mut eraser = ToggleButton::new("Eraser", ui_state.eraser_active);
                if let Some(hint) = eraser_hint.as_deref() {
                    eraser = eraser.shortcut(hint);
                }
                if eraser.show(ui) {
                    action = Some(UiAction::ToggleEraser);
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let mut download = ActionButton::primary("Download");
                    if let Some(hint) = download_hint.as_deref() {
                        download = download.shortcut(hint);
                    }
                    if download.show(ui) {
                        action = Some(UiAction::Download);
                    }
                });
            });
        });

    action
}

/// Render the shortcut summary under the card.
fn render_hint(ctx: &Context, layout: &PageLayout) {
    let card = layout.card_rect;
    egui::Area::new(Id::new("shortcut_hint"))
        .fixed_pos(Pos2::new(card.x0 as f32, card.y1 as f32 + 12.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_width(card.width() as f32);
            ui.vertical_centered(|ui| {
                shortcut_hint(ui, &ShortcutRegistry::summary());
            });
        });
}

/// Render the status toast at the bottom of the window.
fn render_status(ctx: &Context, ui_state: &UiState) {
    let Some(status) = &ui_state.status else {
        return;
    };
    let color = if status.is_error {
        Color32::from_rgb(252, 165, 165)
    } else {
        Color32::WHITE
    };
    egui::Area::new(Id::new("status"))
        .anchor(Align2::CENTER_BOTTOM, Vec2::new(0.0, -24.0))
        .interactable(false)
        .show(ctx, |ui| {
            toast_frame().show(ui, |ui| {
                ui.label(RichText::new(&status.text).color(color));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_with_destination() {
        let mut ui_state = UiState::default();
        ui_state.show_report(&ExportReport {
            primary: SaveOutcome::Cancelled,
            fallback: Some(SaveOutcome::Saved("/tmp/signature.png".into())),
        });
        let status = ui_state.status.as_ref().unwrap();
        assert_eq!(status.text, "Saved to /tmp/signature.png");
        assert!(!status.is_error);
    }

    #[test]
    fn test_report_failure() {
        let mut ui_state = UiState::default();
        ui_state.show_report(&ExportReport {
            primary: SaveOutcome::Unsupported,
            fallback: Some(SaveOutcome::Failed("blocked".into())),
        });
        let status = ui_state.status.as_ref().unwrap();
        assert_eq!(status.text, "Download failed: blocked");
        assert!(status.is_error);
    }

    #[test]
    fn test_status_expires() {
        let mut ui_state = UiState::default();
        ui_state.show_status("hello", false);
        let shown = ui_state.status.as_ref().unwrap().shown_at;

        ui_state.expire_status(shown + Duration::from_secs(1));
        assert!(ui_state.status.is_some());

        ui_state.expire_status(shown + STATUS_DURATION);
        assert!(ui_state.status.is_none());
    }

    #[test]
    fn test_render_ui_runs_headless() {
        let ctx = Context::default();
        let mut ui_state = UiState::default();
        let layout = PageLayout::compute(kurbo::Size::new(1024.0, 768.0));

        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, &mut ui_state, &layout, false);
        });
        assert_eq!(action, None);
    }
}
