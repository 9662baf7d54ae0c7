//! The drawing surface controller.

use crate::config::PadConfig;
use crate::export::{ExportError, ExportFile};
use crate::input::{EventResponse, PointerEvent, PointerKind, to_surface};
use crate::session::Session;
use crate::stroke::{Mode, StrokeParams};
use crate::surface::Surface;
use kurbo::{Point, Size};

/// Owns the raster surface, the pen mode and the pointer session.
///
/// All operations are synchronous and safe to call in any state: while the
/// pad is unmounted (or failed to mount) anything touching the surface is a
/// no-op.
#[derive(Debug, Clone, Default)]
pub struct SignaturePad {
    config: PadConfig,
    surface: Option<Surface>,
    mode: Mode,
    /// Parameters the next stroke will capture.
    params: StrokeParams,
    session: Session,
}

impl SignaturePad {
    pub fn new(config: PadConfig) -> Self {
        let params = config.stroke_params(Mode::Draw);
        Self {
            config,
            surface: None,
            mode: Mode::Draw,
            params,
            session: Session::Idle,
        }
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    /// Size the surface to the displayed dimensions.
    ///
    /// Only the first successful call per mount allocates; later calls are
    /// ignored until [`unmount`](Self::unmount). Returns whether a surface was
    /// allocated by this call.
    pub fn mount(&mut self, width: u32, height: u32) -> bool {
        if self.surface.is_some() {
            log::debug!("Pad already mounted, ignoring resize to {}x{}", width, height);
            return false;
        }
        match Surface::new(width, height) {
            Ok(surface) => {
                log::info!("Mounted signature pad at {}x{}", width, height);
                self.surface = Some(surface);
                self.params = self.config.stroke_params(self.mode);
                true
            }
            Err(e) => {
                log::warn!("Failed to mount signature pad: {}", e);
                false
            }
        }
    }

    /// Discard the surface, end any session and return to draw mode.
    pub fn unmount(&mut self) {
        if self.surface.take().is_some() {
            log::info!("Unmounted signature pad");
        }
        self.session = Session::Idle;
        self.mode = Mode::Draw;
        self.params = self.config.stroke_params(Mode::Draw);
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Surface size, if mounted.
    pub fn size(&self) -> Option<Size> {
        self.surface.as_ref().map(Surface::size)
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    /// Parameters the next stroke will use.
    pub fn stroke_params(&self) -> StrokeParams {
        self.params
    }

    /// Start a stroke at a surface-relative point. Nothing is painted yet.
    pub fn begin_stroke(&mut self, point: Point) {
        if self.surface.is_none() {
            log::debug!("Ignoring stroke start on unmounted pad");
            return;
        }
        self.session.begin(point, self.params);
    }

    /// Continue the stroke to a surface-relative point.
    ///
    /// Returns whether a segment was painted.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let Some(segment) = self.session.extend(point) else {
            return false;
        };
        surface.stroke_segment(segment.from, segment.to, &segment.params);
        true
    }

    /// End the current stroke, if any.
    pub fn end_stroke(&mut self) {
        self.session.end();
    }

    /// Erase the whole surface. An active stroke keeps going.
    pub fn clear(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
    }

    /// Flip between draw and erase.
    ///
    /// The next stroke picks up the new parameters; a stroke in progress
    /// keeps the ones it started with.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.params = self.config.stroke_params(self.mode);
        log::debug!("Pen mode: {}", self.mode.name());
    }

    /// Route a window-space pointer event given the surface's on-screen origin.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent, origin: Point) -> EventResponse {
        let point = to_surface(event.position(), origin);
        match event {
            PointerEvent::Down { .. } => {
                self.begin_stroke(point);
                EventResponse::default()
            }
            PointerEvent::Move { .. } => {
                let painted = self.extend_stroke(point);
                // Only touch moves would otherwise scroll or zoom the page
                EventResponse {
                    consumed: painted && event.kind() == PointerKind::Touch,
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Leave { .. } => {
                self.end_stroke();
                EventResponse::default()
            }
        }
    }

    /// Encode the surface as `signature.png`. Never mutates the surface.
    pub fn export_file(&self) -> Result<ExportFile, ExportError> {
        let surface = self.surface.as_ref().ok_or(ExportError::Unmounted)?;
        ExportFile::from_surface(surface)
    }
}
