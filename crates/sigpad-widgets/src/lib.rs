//! Reusable egui widget components with Tailwind-inspired styling.
//!
//! - **Buttons**: outline and primary action buttons, toggle buttons
//! - **Frames**: toast frame for status messages
//! - **Layout**: page header and spacing helpers

pub mod buttons;
pub mod frame;
pub mod layout;

pub use buttons::{ActionButton, ButtonStyle, ToggleButton};
pub use frame::toast_frame;
pub use layout::{page_header, shortcut_hint};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Action button height
    pub const BUTTON_HEIGHT: f32 = 40.0;
    /// Horizontal padding of outline buttons
    pub const BUTTON_PADDING: f32 = 16.0;
    /// Horizontal padding of primary buttons
    pub const PRIMARY_PADDING: f32 = 24.0;
    /// Gap between buttons in a row
    pub const BUTTON_GAP: f32 = 8.0;
    /// Button corner radius
    pub const CORNER_RADIUS: u8 = 8;
    /// Button label size
    pub const LABEL_SIZE: f32 = 16.0;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Heading color (gray-900)
    pub const TEXT: Color32 = Color32::from_rgb(17, 24, 39);
    /// Body text color (gray-600)
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(75, 85, 99);
    /// Button border (gray-300)
    pub const BORDER: Color32 = Color32::from_rgb(209, 213, 219);
    /// Active border (blue-500)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Active text (blue-600)
    pub const ACCENT_TEXT: Color32 = Color32::from_rgb(37, 99, 235);
    /// Hover background (gray-50)
    pub const HOVER_BG: Color32 = Color32::from_rgb(249, 250, 251);
    /// Selected background (blue-50)
    pub const SELECTED_BG: Color32 = Color32::from_rgb(239, 246, 255);
    /// Selected hover background (blue-100)
    pub const SELECTED_HOVER_BG: Color32 = Color32::from_rgb(219, 234, 254);
    /// Primary button fill
    pub const PRIMARY: Color32 = Color32::BLACK;
    /// Primary button hover fill (gray-800)
    pub const PRIMARY_HOVER: Color32 = Color32::from_rgb(31, 41, 55);
    /// Toast background
    pub const TOAST_BG: Color32 = Color32::from_rgba_premultiplied(17, 24, 39, 235);
}
