//! Pen modes and the stroke parameters they select.

use serde::{Deserialize, Serialize};

/// Stroke width used in draw mode.
pub const DRAW_WIDTH: f32 = 2.0;
/// Stroke width used in erase mode.
pub const ERASE_WIDTH: f32 = 20.0;

/// Persistent pen mode, read by each new stroke session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    #[default]
    Draw,
    Erase,
}

impl Mode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Mode::Draw => Mode::Erase,
            Mode::Erase => Mode::Draw,
        }
    }

    /// Get display name for this mode.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Draw => "Pen",
            Mode::Erase => "Eraser",
        }
    }
}

/// Pixel blending rule applied when a segment is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Compositing {
    /// Paint over existing pixels.
    #[default]
    SourceOver,
    /// Remove existing pixels where the stroke covers them.
    DestinationOut,
}

impl Compositing {
    pub(crate) fn blend_mode(self) -> tiny_skia::BlendMode {
        match self {
            Compositing::SourceOver => tiny_skia::BlendMode::SourceOver,
            Compositing::DestinationOut => tiny_skia::BlendMode::DestinationOut,
        }
    }
}

/// RGBA pen color (non-premultiplied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PenColor {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#rrggbb` or `#rgb` hex color.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b, 255))
            }
            3 => {
                let mut channels = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    channels[i] = v * 17;
                }
                Some(Self::new(channels[0], channels[1], channels[2], 255))
            }
            _ => None,
        }
    }
}

impl Default for PenColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Parameters used to render one stroke segment.
///
/// Caps and joins are always round; only width and compositing depend on the mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeParams {
    pub color: PenColor,
    pub width: f32,
    pub compositing: Compositing,
}

impl StrokeParams {
    /// Default parameters for a mode.
    pub fn for_mode(mode: Mode) -> Self {
        Self::for_mode_with(mode, PenColor::BLACK, DRAW_WIDTH, ERASE_WIDTH)
    }

    /// Parameters for a mode with custom pen color and widths.
    pub fn for_mode_with(mode: Mode, color: PenColor, draw_width: f32, erase_width: f32) -> Self {
        match mode {
            Mode::Draw => Self {
                color,
                width: draw_width,
                compositing: Compositing::SourceOver,
            },
            Mode::Erase => Self {
                color,
                width: erase_width,
                compositing: Compositing::DestinationOut,
            },
        }
    }

    /// Build the tiny-skia paint for these parameters.
    pub(crate) fn paint(&self) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(self.color.r, self.color.g, self.color.b, self.color.a);
        paint.anti_alias = true;
        paint.blend_mode = self.compositing.blend_mode();
        paint
    }

    /// Build the tiny-skia stroke for these parameters.
    pub(crate) fn stroke(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.width,
            line_cap: tiny_skia::LineCap::Round,
            line_join: tiny_skia::LineJoin::Round,
            ..Default::default()
        }
    }
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self::for_mode(Mode::Draw)
    }
}
