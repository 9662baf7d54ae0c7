//! Pointer session state machine.

use crate::stroke::StrokeParams;
use kurbo::Point;

/// State of the current pointer interaction.
///
/// A session holds the parameters captured when it began, so changing the
/// pad's mode mid-stroke does not affect the stroke in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Session {
    /// No pointer is pressed on the surface.
    #[default]
    Idle,
    /// A stroke is in progress.
    Drawing {
        /// Last committed point, in surface coordinates.
        anchor: Point,
        /// Parameters the stroke renders with.
        params: StrokeParams,
    },
}

/// A segment ready to be rendered onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub params: StrokeParams,
}

impl Session {
    /// Start (or restart) a stroke anchored at `point`.
    pub fn begin(&mut self, point: Point, params: StrokeParams) {
        *self = Session::Drawing {
            anchor: point,
            params,
        };
    }

    /// Advance the stroke to `point`, returning the segment to render.
    ///
    /// Returns `None` when idle.
    pub fn extend(&mut self, point: Point) -> Option<Segment> {
        match self {
            Session::Idle => None,
            Session::Drawing { anchor, params } => {
                let segment = Segment {
                    from: *anchor,
                    to: point,
                    params: *params,
                };
                *anchor = point;
                Some(segment)
            }
        }
    }

    /// End the stroke. Returns whether a stroke was in progress.
    pub fn end(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        *self = Session::Idle;
        was_drawing
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Session::Drawing { .. })
    }

    /// Current anchor, if drawing.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Session::Idle => None,
            Session::Drawing { anchor, .. } => Some(*anchor),
        }
    }

    /// Parameters of the stroke in progress, if drawing.
    pub fn params(&self) -> Option<StrokeParams> {
        match self {
            Session::Idle => None,
            Session::Drawing { params, .. } => Some(*params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Mode;

    #[test]
    fn test_idle_extend_is_noop() {
        let mut session = Session::default();
        assert_eq!(session.extend(Point::new(1.0, 1.0)), None);
        assert!(!session.end());
    }

    #[test]
    fn test_extend_moves_anchor() {
        let mut session = Session::default();
        let params = StrokeParams::for_mode(Mode::Draw);
        session.begin(Point::new(10.0, 10.0), params);

        let seg = session.extend(Point::new(20.0, 10.0)).unwrap();
        assert_eq!(seg.from, Point::new(10.0, 10.0));
        assert_eq!(seg.to, Point::new(20.0, 10.0));

        let seg = session.extend(Point::new(30.0, 15.0)).unwrap();
        assert_eq!(seg.from, Point::new(20.0, 10.0));
        assert_eq!(session.anchor(), Some(Point::new(30.0, 15.0)));
    }

    #[test]
    fn test_begin_restarts_tracking() {
        let mut session = Session::default();
        session.begin(Point::new(10.0, 10.0), StrokeParams::for_mode(Mode::Draw));
        session.begin(Point::new(40.0, 40.0), StrokeParams::for_mode(Mode::Erase));

        assert_eq!(session.anchor(), Some(Point::new(40.0, 40.0)));
        assert_eq!(session.params(), Some(StrokeParams::for_mode(Mode::Erase)));
    }

    #[test]
    fn test_end_returns_to_idle() {
        let mut session = Session::default();
        session.begin(Point::ZERO, StrokeParams::default());
        assert!(session.end());
        assert!(!session.is_drawing());
        assert_eq!(session.extend(Point::new(5.0, 5.0)), None);
    }
}
