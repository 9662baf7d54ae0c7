//! Pointer input: unified mouse/touch events and window-to-surface mapping.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Source of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are absolute window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, kind: PointerKind },
    Move { position: Point, kind: PointerKind },
    Up { position: Point, kind: PointerKind },
    /// The pointer left the surface.
    Leave { position: Point, kind: PointerKind },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Leave { position, .. } => position,
        }
    }

    pub fn kind(&self) -> PointerKind {
        match *self {
            PointerEvent::Down { kind, .. }
            | PointerEvent::Move { kind, .. }
            | PointerEvent::Up { kind, .. }
            | PointerEvent::Leave { kind, .. } => kind,
        }
    }
}

/// What the host should do with an event after the pad has seen it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// The pad used the event; suppress default scroll/gesture handling.
    pub consumed: bool,
}

/// Translate a window position into surface-relative coordinates.
pub fn to_surface(position: Point, surface_origin: Point) -> Point {
    position - surface_origin.to_vec2()
}

/// Touch phases, mirroring the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Low-level window input before it is filtered into pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    CursorMoved(Point),
    /// Primary mouse button pressed or released at the last cursor position.
    MouseButton { pressed: bool },
    CursorLeft,
    Touch { id: u64, phase: TouchPhase, position: Point },
}

/// Tracks pointer state across window events and emits pointer events
/// scoped to the surface rectangle.
///
/// Presses only start on the surface, leaving the surface while the mouse is
/// over it emits `Leave`, and only the first touch is followed.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in window coordinates.
    pub pointer_position: Point,
    /// Whether the mouse cursor is over the surface.
    inside: bool,
    /// Touch id being followed, if any.
    active_touch: Option<u64>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the mouse cursor is currently over the surface.
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Touch currently being followed.
    pub fn active_touch(&self) -> Option<u64> {
        self.active_touch
    }

    /// Process one raw input and return the pointer event it produces, if any.
    pub fn process(&mut self, input: RawInput, surface_rect: Rect) -> Option<PointerEvent> {
        let kind = PointerKind::Mouse;
        match input {
            RawInput::CursorMoved(position) => {
                self.pointer_position = position;
                let was_inside = self.inside;
                self.inside = surface_rect.contains(position);
                if self.inside {
                    Some(PointerEvent::Move { position, kind })
                } else if was_inside {
                    Some(PointerEvent::Leave { position, kind })
                } else {
                    None
                }
            }
            RawInput::MouseButton { pressed } => {
                if !self.inside {
                    return None;
                }
                let position = self.pointer_position;
                if pressed {
                    Some(PointerEvent::Down { position, kind })
                } else {
                    Some(PointerEvent::Up { position, kind })
                }
            }
            RawInput::CursorLeft => {
                if !self.inside {
                    return None;
                }
                self.inside = false;
                Some(PointerEvent::Leave {
                    position: self.pointer_position,
                    kind,
                })
            }
            RawInput::Touch { id, phase, position } => {
                let kind = PointerKind::Touch;
                match phase {
                    TouchPhase::Started => {
                        if self.active_touch.is_some() || !surface_rect.contains(position) {
                            return None;
                        }
                        self.active_touch = Some(id);
                        self.pointer_position = position;
                        Some(PointerEvent::Down { position, kind })
                    }
                    TouchPhase::Moved => {
                        if self.active_touch != Some(id) {
                            return None;
                        }
                        self.pointer_position = position;
                        Some(PointerEvent::Move { position, kind })
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        if self.active_touch != Some(id) {
                            return None;
                        }
                        self.active_touch = None;
                        self.pointer_position = position;
                        Some(PointerEvent::Up { position, kind })
                    }
                }
            }
        }
    }
}
