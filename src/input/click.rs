use glam::Vec2;

/// Press/release state machine that separates clicks from drags.
///
/// A press followed by a release counts as a click only if the pointer
/// stayed within `threshold` pixels of where it went down. Anything further
/// is a drag, which orbits the camera and never selects.
pub(crate) struct ClickTracker {
    /// Latest cursor position.
    pos: Vec2,
    /// Where the active press started.
    press: Option<Vec2>,
    dragging: bool,
    threshold: f32,
}

/// What a pointer move means while a button may be held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Motion {
    /// No button held, or still inside the click tolerance.
    Idle,
    /// Dragging; the delta to apply this move.
    Drag(Vec2),
}

impl ClickTracker {
    pub(crate) fn new(threshold: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            press: None,
            dragging: false,
            threshold: threshold.max(0.0),
        }
    }

    pub(crate) fn press(&mut self) {
        self.press = Some(self.pos);
        self.dragging = false;
    }

    /// Track a cursor move.
    ///
    /// The move that first crosses the threshold reports the whole travel
    /// since the press, so the camera does not lag behind the pointer.
    pub(crate) fn move_to(&mut self, x: f32, y: f32) -> Motion {
        let next = Vec2::new(x, y);
        let delta = next - self.pos;
        self.pos = next;

        let Some(start) = self.press else {
            return Motion::Idle;
        };
        if self.dragging {
            return Motion::Drag(delta);
        }
        if start.distance(next) > self.threshold {
            self.dragging = true;
            return Motion::Drag(next - start);
        }
        Motion::Idle
    }

    /// End the press. Returns the click position if it was a click.
    pub(crate) fn release(&mut self) -> Option<Vec2> {
        let start = self.press.take()?;
        let was_drag = std::mem::take(&mut self.dragging);
        (!was_drag).then_some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_jitter_is_still_a_click() {
        let mut t = ClickTracker::new(4.0);
        let _ = t.move_to(100.0, 100.0);
        t.press();
        assert_eq!(t.move_to(102.0, 101.0), Motion::Idle);
        assert_eq!(t.release(), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn crossing_threshold_becomes_drag() {
        let mut t = ClickTracker::new(4.0);
        let _ = t.move_to(10.0, 10.0);
        t.press();
        assert_eq!(t.move_to(12.0, 10.0), Motion::Idle);
        assert_eq!(t.move_to(20.0, 10.0), Motion::Drag(Vec2::new(10.0, 0.0)));
        assert_eq!(t.move_to(21.0, 12.0), Motion::Drag(Vec2::new(1.0, 2.0)));
        assert_eq!(t.release(), None);
        // Released: further motion is no longer a drag
        assert_eq!(t.move_to(30.0, 10.0), Motion::Idle);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut t = ClickTracker::new(4.0);
        assert_eq!(t.release(), None);
        assert_eq!(t.move_to(50.0, 50.0), Motion::Idle);
    }
}
