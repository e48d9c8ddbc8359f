/// Input mapping: key intents and swipe gestures → pending direction.
///
/// The pending direction is the only thing input may touch. It is
/// last-write-wins between ticks; a write is rejected when it would
/// reverse the direction committed on the last tick.

use crate::domain::cell::{Direction, PixelPoint};
use super::world::{Phase, World};

/// Request a turn. Returns whether the pending direction changed hands.
pub fn steer(world: &mut World, dir: Direction) -> bool {
    if world.phase != Phase::Running { return false; }
    if dir.is_reverse_of(world.direction) { return false; }
    world.pending = dir;
    true
}

/// Classify a drag by its dominant axis.
///
/// Below `threshold` on both axes it is not a swipe. Equal magnitudes
/// count as vertical.
pub fn classify_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax < threshold && ay < threshold {
        return None;
    }
    Some(if ax > ay {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    })
}

/// Tracks one pointer gesture from press to release.
#[derive(Clone, Debug)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<PixelPoint>,
    last: Option<PixelPoint>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        SwipeTracker { threshold, start: None, last: None }
    }

    pub fn begin(&mut self, p: PixelPoint) {
        self.start = Some(p);
        self.last = Some(p);
    }

    pub fn update(&mut self, p: PixelPoint) {
        if self.start.is_some() {
            self.last = Some(p);
        }
    }

    /// End the gesture (optionally at a final point) and classify it.
    pub fn finish(&mut self, end: Option<PixelPoint>) -> Option<Direction> {
        if let Some(p) = end {
            self.update(p);
        }
        let (start, last) = (self.start.take()?, self.last.take()?);
        classify_swipe(last.x - start.x, last.y - start.y, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::Cell;

    fn running_right() -> World {
        let mut w = World::new(26);
        w.snake = [Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)].into_iter().collect();
        w.phase = Phase::Running;
        w
    }

    fn pt(x: f32, y: f32) -> PixelPoint {
        PixelPoint { x, y }
    }

    #[test]
    fn reverse_of_committed_is_rejected() {
        let mut w = running_right();
        assert!(!steer(&mut w, Direction::Left));
        assert_eq!(w.pending, Direction::Right);
        assert!(steer(&mut w, Direction::Up));
        assert_eq!(w.pending, Direction::Up);
    }

    #[test]
    fn last_valid_input_before_tick_wins() {
        let mut w = running_right();
        assert!(steer(&mut w, Direction::Down));
        assert!(steer(&mut w, Direction::Up));
        assert_eq!(w.pending, Direction::Up);
    }

    #[test]
    fn reversal_is_checked_against_committed_not_pending() {
        let mut w = running_right();
        steer(&mut w, Direction::Up);
        // Left reverses the committed Right even though Up is pending.
        assert!(!steer(&mut w, Direction::Left));
        assert_eq!(w.pending, Direction::Up);
    }

    #[test]
    fn ignored_unless_running() {
        let mut w = running_right();
        w.phase = Phase::Paused;
        assert!(!steer(&mut w, Direction::Up));
        w.phase = Phase::GameOver;
        assert!(!steer(&mut w, Direction::Up));
        assert_eq!(w.pending, Direction::Right);
    }

    #[test]
    fn swipe_classification() {
        assert_eq!(classify_swipe(30.0, 5.0, 24.0), Some(Direction::Right));
        assert_eq!(classify_swipe(-30.0, 10.0, 24.0), Some(Direction::Left));
        assert_eq!(classify_swipe(4.0, 40.0, 24.0), Some(Direction::Down));
        assert_eq!(classify_swipe(4.0, -40.0, 24.0), Some(Direction::Up));
        assert_eq!(classify_swipe(23.0, -23.0, 24.0), None);
        assert_eq!(classify_swipe(30.0, 30.0, 24.0), Some(Direction::Down));
    }

    #[test]
    fn tracker_uses_last_point_of_the_gesture() {
        let mut s = SwipeTracker::new(24.0);
        s.begin(pt(100.0, 100.0));
        s.update(pt(110.0, 100.0));
        s.update(pt(60.0, 105.0));
        assert_eq!(s.finish(None), Some(Direction::Left));
        // Gesture consumed.
        assert_eq!(s.finish(None), None);
    }

    #[test]
    fn tracker_ignores_moves_without_press() {
        let mut s = SwipeTracker::new(24.0);
        s.update(pt(0.0, 0.0));
        assert_eq!(s.finish(Some(pt(200.0, 0.0))), None);
        s.begin(pt(0.0, 0.0));
        assert_eq!(s.finish(Some(pt(10.0, 5.0))), None);
    }
}
