//! Translates window events into pad operations.

use kurbo::{Point, Rect};
use sigpad_core::input::{EventResponse, InputState, RawInput, TouchPhase};
use sigpad_core::pad::SignaturePad;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Convert a physical window position to logical pixels.
pub fn to_logical(position: PhysicalPosition<f64>, scale_factor: f64) -> Point {
    Point::new(position.x / scale_factor, position.y / scale_factor)
}

/// Map a winit touch phase.
pub fn touch_phase(phase: winit::event::TouchPhase) -> TouchPhase {
    match phase {
        winit::event::TouchPhase::Started => TouchPhase::Started,
        winit::event::TouchPhase::Moved => TouchPhase::Moved,
        winit::event::TouchPhase::Ended => TouchPhase::Ended,
        winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

/// Extract the pointer input a window event carries, if any.
pub fn raw_input(event: &WindowEvent, scale_factor: f64) -> Option<RawInput> {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            Some(RawInput::CursorMoved(to_logical(*position, scale_factor)))
        }
        WindowEvent::MouseInput {
            state,
            button: MouseButton::Left,
            ..
        } => Some(RawInput::MouseButton {
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::CursorLeft { .. } => Some(RawInput::CursorLeft),
        WindowEvent::Touch(touch) => Some(RawInput::Touch {
            id: touch.id,
            phase: touch_phase(touch.phase),
            position: to_logical(touch.location, scale_factor),
        }),
        _ => None,
    }
}

/// Feeds window input through pointer tracking into the pad.
#[derive(Debug, Default)]
pub struct EventHandler {
    input: InputState,
    /// Ctrl (or Cmd) is held.
    ctrl: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer tracking state.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn ctrl(&self) -> bool {
        self.ctrl
    }

    pub fn set_ctrl(&mut self, ctrl: bool) {
        self.ctrl = ctrl;
    }

    /// Whether the mouse is over the drawing surface.
    pub fn pointer_over_surface(&self) -> bool {
        self.input.is_inside()
    }

    /// Run one raw input through the pad. `surface_rect` is in logical pixels.
    pub fn process(
        &mut self,
        raw: RawInput,
        surface_rect: Rect,
        pad: &mut SignaturePad,
    ) -> EventResponse {
        match self.input.process(raw, surface_rect) {
            Some(event) => pad.handle_pointer_event(&event, surface_rect.origin()),
            None => {
                log::trace!("Ignoring {:?} outside the surface", raw);
                EventResponse::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigpad_core::config::PadConfig;

    fn setup() -> (EventHandler, SignaturePad, Rect) {
        let rect = Rect::new(100.0, 50.0, 300.0, 150.0);
        let mut pad = SignaturePad::new(PadConfig::default());
        pad.mount(200, 100);
        (EventHandler::new(), pad, rect)
    }

    #[test]
    fn test_to_logical_divides_scale() {
        let p = to_logical(PhysicalPosition::new(300.0, 120.0), 2.0);
        assert_eq!(p, Point::new(150.0, 60.0));
    }

    #[test]
    fn test_touch_phase_mapping() {
        assert_eq!(touch_phase(winit::event::TouchPhase::Started), TouchPhase::Started);
        assert_eq!(touch_phase(winit::event::TouchPhase::Cancelled), TouchPhase::Cancelled);
    }

    #[test]
    fn test_mouse_drag_draws_in_surface_coordinates() {
        let (mut handler, mut pad, rect) = setup();

        handler.process(RawInput::CursorMoved(Point::new(110.0, 60.0)), rect, &mut pad);
        handler.process(RawInput::MouseButton { pressed: true }, rect, &mut pad);
        let response = handler.process(RawInput::CursorMoved(Point::new(150.0, 60.0)), rect, &mut pad);
        // Mouse moves have no default gesture to suppress
        assert!(!response.consumed);
        handler.process(RawInput::MouseButton { pressed: false }, rect, &mut pad);

        assert!(!pad.is_drawing());
        let surface = pad.surface().unwrap();
        assert!(surface.alpha(30, 10) > 0);
        assert_eq!(surface.alpha(30, 40), 0);
    }

    #[test]
    fn test_leaving_surface_ends_stroke() {
        let (mut handler, mut pad, rect) = setup();

        handler.process(RawInput::CursorMoved(Point::new(110.0, 60.0)), rect, &mut pad);
        handler.process(RawInput::MouseButton { pressed: true }, rect, &mut pad);
        assert!(pad.is_drawing());

        handler.process(RawInput::CursorMoved(Point::new(400.0, 60.0)), rect, &mut pad);
        assert!(!pad.is_drawing());
        assert!(!handler.pointer_over_surface());

        // Coming back without pressing again does not draw
        handler.process(RawInput::CursorMoved(Point::new(120.0, 60.0)), rect, &mut pad);
        handler.process(RawInput::CursorMoved(Point::new(180.0, 60.0)), rect, &mut pad);
        assert!(pad.surface().unwrap().is_blank());
    }

    #[test]
    fn test_press_outside_surface_does_not_draw() {
        let (mut handler, mut pad, rect) = setup();

        handler.process(RawInput::CursorMoved(Point::new(20.0, 20.0)), rect, &mut pad);
        handler.process(RawInput::MouseButton { pressed: true }, rect, &mut pad);
        handler.process(RawInput::CursorMoved(Point::new(150.0, 60.0)), rect, &mut pad);
        handler.process(RawInput::CursorMoved(Point::new(200.0, 60.0)), rect, &mut pad);

        assert!(!pad.is_drawing());
        assert!(pad.surface().unwrap().is_blank());
    }

    #[test]
    fn test_touch_stroke() {
        let (mut handler, mut pad, rect) = setup();
        let touch = |phase, x| RawInput::Touch {
            id: 3,
            phase,
            position: Point::new(x, 100.0),
        };

        handler.process(touch(TouchPhase::Started, 120.0), rect, &mut pad);
        let response = handler.process(touch(TouchPhase::Moved, 180.0), rect, &mut pad);
        assert!(response.consumed);
        handler.process(touch(TouchPhase::Ended, 180.0), rect, &mut pad);

        assert!(pad.surface().unwrap().alpha(50, 50) > 0);
    }
}
