/// World: the complete state of one snake game.
///
/// ## Occupancy
///
/// Three disjoint layers share the grid:
///   - `snake`    : head at the front, tail at the back
///   - `obstacles`: grows by one per food eaten
///   - `food`     : at most one cell
///
/// Spawning keeps them disjoint; `step` is the only mutator during play.
///
/// ## Effects
///
/// `effects` holds collect flashes for the renderer. They carry wall-clock
/// timestamps (time since app start) and never influence the simulation.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;

use crate::domain::cell::{Cell, Direction, PixelPoint};
use super::spawn;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug)]
pub struct CollectEffect {
    pub origin: PixelPoint,
    pub started: Duration,
}

impl CollectEffect {
    /// 0.0 at start, 1.0 at expiry; None once expired.
    pub fn progress(&self, now: Duration, lifetime: Duration) -> Option<f32> {
        let elapsed = now.saturating_sub(self.started);
        if lifetime.is_zero() || elapsed >= lifetime {
            None
        } else {
            Some(elapsed.as_secs_f32() / lifetime.as_secs_f32())
        }
    }
}

pub struct World {
    pub size: i32,
    pub phase: Phase,

    // ── Bodies ──
    pub snake: VecDeque<Cell>,
    pub obstacles: Vec<Cell>,
    pub food: Option<Cell>,

    // ── Steering ──
    /// Direction committed on the last tick.
    pub direction: Direction,
    /// Direction to commit on the next tick (last valid input wins).
    pub pending: Direction,

    // ── Scoring ──
    pub score: u32,
    pub high_score: u32,
    pub points_per_food: u32,

    // ── Presentation ──
    pub effects: Vec<CollectEffect>,
    pub effect_lifetime: Duration,

    // ── Bookkeeping ──
    pub started_at: Duration,
    pub tick: u64,
}

pub const START_LENGTH: i32 = 3;

impl World {
    pub fn new(size: i32) -> Self {
        World {
            size,
            phase: Phase::Idle,
            snake: VecDeque::new(),
            obstacles: vec![],
            food: None,
            direction: Direction::Right,
            pending: Direction::Right,
            score: 0,
            high_score: 0,
            points_per_food: 10,
            effects: vec![],
            effect_lifetime: Duration::from_millis(550),
            started_at: Duration::ZERO,
            tick: 0,
        }
    }

    /// Fresh game: centered 3-segment snake facing right, no obstacles,
    /// one food, score 0, Running.
    pub fn reset<R: Rng>(&mut self, rng: &mut R, now: Duration) {
        let mid = self.size / 2;
        self.snake = (0..START_LENGTH)
            .map(|i| Cell::new((mid - i).rem_euclid(self.size), mid))
            .collect();
        self.obstacles.clear();
        self.effects.clear();
        self.food = None;
        self.direction = Direction::Right;
        self.pending = Direction::Right;
        self.score = 0;
        self.tick = 0;
        self.started_at = now;
        spawn::spawn_food(self, rng);
        self.phase = Phase::Running;
    }

    pub fn head(&self) -> Option<Cell> {
        self.snake.front().copied()
    }

    pub fn snake_contains(&self, c: Cell) -> bool {
        self.snake.contains(&c)
    }

    pub fn obstacle_at(&self, c: Cell) -> bool {
        self.obstacles.contains(&c)
    }

    /// Not snake, not obstacle. Food placement uses this.
    pub fn is_open(&self, c: Cell) -> bool {
        !self.snake_contains(c) && !self.obstacle_at(c)
    }

    /// Not snake, not obstacle, not food. Obstacle placement uses this.
    pub fn is_free(&self, c: Cell) -> bool {
        self.is_open(c) && self.food != Some(c)
    }

    pub fn cell_count(&self) -> usize {
        (self.size * self.size) as usize
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Drop effects whose lifetime has elapsed.
    pub fn prune_effects(&mut self, now: Duration) {
        let lifetime = self.effect_lifetime;
        self.effects.retain(|e| e.progress(now, lifetime).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn reset_builds_centered_snake() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut w = World::new(26);
        w.reset(&mut rng, Duration::from_secs(3));
        assert_eq!(w.phase, Phase::Running);
        assert_eq!(
            w.snake.iter().copied().collect::<Vec<_>>(),
            vec![Cell::new(13, 13), Cell::new(12, 13), Cell::new(11, 13)]
        );
        assert_eq!(w.direction, Direction::Right);
        assert_eq!(w.started_at, Duration::from_secs(3));
        let food = w.food.unwrap();
        assert!(food.in_bounds(26));
        assert!(!w.snake_contains(food));
    }

    #[test]
    fn reset_clears_previous_game() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut w = World::new(26);
        w.reset(&mut rng, Duration::ZERO);
        w.obstacles.push(Cell::new(0, 0));
        w.score = 90;
        w.pending = Direction::Up;
        w.effects.push(CollectEffect { origin: Cell::new(1, 1).pixel_center(), started: Duration::ZERO });
        w.reset(&mut rng, Duration::from_secs(1));
        assert!(w.obstacles.is_empty());
        assert!(w.effects.is_empty());
        assert_eq!(w.score, 0);
        assert_eq!(w.pending, Direction::Right);
    }

    #[test]
    fn effects_expire_after_lifetime() {
        let mut w = World::new(26);
        let origin = Cell::new(2, 2).pixel_center();
        w.effects.push(CollectEffect { origin, started: Duration::from_millis(100) });
        w.prune_effects(Duration::from_millis(649));
        assert_eq!(w.effects.len(), 1);
        let p = w.effects[0].progress(Duration::from_millis(375), w.effect_lifetime).unwrap();
        assert!((p - 0.5).abs() < 1e-3);
        w.prune_effects(Duration::from_millis(650));
        assert!(w.effects.is_empty());
    }

    #[test]
    fn free_and_open_cells() {
        let mut w = World::new(10);
        w.snake.push_back(Cell::new(1, 1));
        w.obstacles.push(Cell::new(2, 2));
        w.food = Some(Cell::new(3, 3));
        assert!(!w.is_open(Cell::new(1, 1)));
        assert!(!w.is_open(Cell::new(2, 2)));
        assert!(w.is_open(Cell::new(3, 3)));
        assert!(!w.is_free(Cell::new(3, 3)));
        assert!(w.is_free(Cell::new(4, 4)));
    }
}
