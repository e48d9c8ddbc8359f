/// Game controller: owns the world and everything that drives it.
///
/// State machine (see `world::Phase`):
///
///   Idle ──start──▶ Running ◀──toggle_pause──▶ Paused
///                     │  ▲
///             collide │  │ restart
///                     ▼  │
///                   GameOver
///
/// The host calls `frame(delta, now)` every render frame. Ticks run on the
/// scheduler's fixed cadence; effects are pruned every frame.

use std::time::Duration;

use chrono::Utc;
use rand::{rngs::SmallRng, SeedableRng};

use crate::config::GameConfig;
use crate::domain::cell::{Direction, PixelPoint};
use crate::domain::session::{sanitize_name, GameSession};
use crate::stats::aggregate::{self, BestPlayer};
use crate::stats::Dashboard;
use crate::store::high_score;
use crate::store::port::KvStore;
use crate::store::stats_log::{self, StatsLog};
use super::event::GameEvent;
use super::scheduler::TickScheduler;
use super::steer::{self, SwipeTracker};
use super::step;
use super::world::{Phase, World};

pub struct Game {
    pub world: World,
    pub player_name: String,
    /// Session recorded by the most recent game over.
    pub last_session: Option<GameSession>,
    scheduler: TickScheduler,
    swipe: SwipeTracker,
    rng: SmallRng,
    store: Box<dyn KvStore>,
    max_stored_games: usize,
    chart_window: usize,
}

impl Game {
    pub fn new(config: &GameConfig, store: Box<dyn KvStore>) -> Self {
        Game::with_rng(config, store, SmallRng::from_entropy())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_seed(config: &GameConfig, store: Box<dyn KvStore>, seed: u64) -> Self {
        Game::with_rng(config, store, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, store: Box<dyn KvStore>, rng: SmallRng) -> Self {
        let mut world = World::new(config.game.grid_size);
        world.points_per_food = config.game.points_per_food;
        world.effect_lifetime = Duration::from_millis(config.collect_effect_ms);
        world.high_score = high_score::load(store.as_ref());
        Game {
            world,
            player_name: sanitize_name(&config.player_name),
            last_session: None,
            scheduler: TickScheduler::new(Duration::from_millis(config.game.tick_rate_ms)),
            swipe: SwipeTracker::new(config.swipe_threshold),
            rng,
            store,
            max_stored_games: config.stats.max_stored_games,
            chart_window: config.stats.chart_window,
        }
    }

    // ── Lifecycle ──

    /// Begin a new game as `name` (trimmed, max 30 chars, default "Player").
    pub fn start(&mut self, name: &str, now: Duration) {
        self.player_name = sanitize_name(name);
        self.begin(now);
    }

    /// Re-enter initialization with the current player.
    /// Allowed after a game over, or mid-game while not paused.
    pub fn restart(&mut self, now: Duration) -> bool {
        match self.world.phase {
            Phase::Running | Phase::GameOver => {
                self.begin(now);
                true
            }
            Phase::Idle | Phase::Paused => false,
        }
    }

    fn begin(&mut self, now: Duration) {
        self.world.reset(&mut self.rng, now);
        self.scheduler.reset();
        self.last_session = None;
        tracing::info!(player = %self.player_name, "game started");
    }

    /// Running ↔ Paused. Returns whether the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.world.phase {
            Phase::Running => self.world.phase = Phase::Paused,
            Phase::Paused => {
                self.world.phase = Phase::Running;
                self.scheduler.reset();
            }
            Phase::Idle | Phase::GameOver => return false,
        }
        true
    }

    // ── Input ──

    pub fn steer(&mut self, dir: Direction) -> bool {
        steer::steer(&mut self.world, dir)
    }

    pub fn pointer_down(&mut self, p: PixelPoint) {
        self.swipe.begin(p);
    }

    pub fn pointer_drag(&mut self, p: PixelPoint) {
        self.swipe.update(p);
    }

    pub fn pointer_up(&mut self, p: PixelPoint) -> bool {
        match self.swipe.finish(Some(p)) {
            Some(dir) => self.steer(dir),
            None => false,
        }
    }

    // ── Time ──

    /// One host frame. Runs a tick when the scheduler says one is due.
    pub fn frame(&mut self, delta: Duration, now: Duration) -> Vec<GameEvent> {
        let events = if self.world.is_running() && self.scheduler.advance(delta) {
            self.tick(now)
        } else {
            vec![]
        };
        self.world.prune_effects(now);
        events
    }

    /// Advance the simulation one step and settle its consequences.
    pub fn tick(&mut self, now: Duration) -> Vec<GameEvent> {
        let events = step::step(&mut self.world, &mut self.rng, now);
        for event in &events {
            match event {
                GameEvent::NewHighScore { score } => {
                    tracing::info!(score, "new high score");
                    high_score::save(self.store.as_mut(), *score);
                }
                GameEvent::FoodEaten { at, score } => {
                    tracing::debug!(x = at.x, y = at.y, score, "food eaten");
                }
                GameEvent::ObstacleSpawned { at } => {
                    tracing::debug!(x = at.x, y = at.y, "obstacle placed");
                }
                GameEvent::ObstacleSkipped => {
                    tracing::debug!("no free cell for a new obstacle");
                }
                GameEvent::Collided { at, with } => {
                    tracing::debug!(x = at.x, y = at.y, ?with, "collision");
                }
                GameEvent::GameOver { score } => self.finish(*score, now),
            }
        }
        events
    }

    fn finish(&mut self, score: u32, now: Duration) {
        let millis = now.saturating_sub(self.world.started_at).as_millis();
        let duration_seconds = (millis as f64 / 1000.0).round() as u64;
        let session = GameSession::new(score, &self.player_name, Utc::now(), duration_seconds);
        tracing::info!(
            player = %session.player_name,
            score,
            duration_seconds,
            "game over"
        );
        let log = stats_log::record_session(self.store.as_mut(), session.clone(), self.max_stored_games);
        tracing::debug!(stored = log.len(), "stats log updated");
        self.last_session = Some(session);
    }

    // ── Stats ──

    pub fn stats_log(&self) -> StatsLog {
        StatsLog::load(self.store.as_ref())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(self.stats_log().entries(), self.chart_window)
    }

    pub fn best_player(&self) -> BestPlayer {
        aggregate::best_player(self.stats_log().entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::Cell;
    use crate::store::port::MemoryStore;
    use crate::store::stats_log::STATS_KEY;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn game() -> Game {
        Game::with_seed(&GameConfig::default(), Box::new(MemoryStore::new()), 11)
    }

    #[test]
    fn start_enters_running_with_sanitized_name() {
        let mut g = game();
        assert_eq!(g.world.phase, Phase::Idle);
        g.start("   ", ms(0));
        assert_eq!(g.world.phase, Phase::Running);
        assert_eq!(g.player_name, "Player");
        g.start("  Mina  ", ms(0));
        assert_eq!(g.player_name, "Mina");
    }

    #[test]
    fn frames_tick_on_the_fixed_interval() {
        let mut g = game();
        g.start("p", ms(0));
        let head = g.world.head().unwrap();
        g.world.food = Some(Cell::new(0, 0));
        for i in 1..=7 {
            g.frame(ms(16), ms(16 * i));
        }
        assert_eq!(g.world.head(), Some(head));
        g.frame(ms(16), ms(128));
        assert_eq!(g.world.head(), Some(Cell::new(head.x + 1, head.y)));
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut g = game();
        g.start("p", ms(0));
        let head = g.world.head();
        assert!(g.toggle_pause());
        assert_eq!(g.world.phase, Phase::Paused);
        assert!(!g.steer(Direction::Up));
        for i in 0..50 {
            g.frame(ms(120), ms(120 * i));
        }
        assert_eq!(g.world.head(), head);
        assert!(!g.restart(ms(0)));
        assert!(g.toggle_pause());
        assert_eq!(g.world.phase, Phase::Running);
    }

    #[test]
    fn last_input_before_tick_takes_effect() {
        let mut g = game();
        g.start("p", ms(0));
        let head = g.world.head().unwrap();
        g.world.food = Some(Cell::new(0, 0));
        assert!(g.steer(Direction::Down));
        assert!(g.steer(Direction::Up));
        g.tick(ms(120));
        assert_eq!(g.world.direction, Direction::Up);
        assert_eq!(g.world.head(), Some(Cell::new(head.x, head.y - 1)));
    }

    #[test]
    fn swipe_turns_the_snake() {
        let mut g = game();
        g.start("p", ms(0));
        g.pointer_down(PixelPoint { x: 200.0, y: 200.0 });
        g.pointer_drag(PixelPoint { x: 205.0, y: 230.0 });
        assert!(g.pointer_up(PixelPoint { x: 205.0, y: 260.0 }));
        assert_eq!(g.world.pending, Direction::Down);
        // Too short to count.
        g.pointer_down(PixelPoint { x: 0.0, y: 0.0 });
        assert!(!g.pointer_up(PixelPoint { x: 10.0, y: 0.0 }));
    }

    #[test]
    fn collision_records_the_session_and_stops_ticking() {
        let mut g = game();
        g.start("Ada", ms(0));
        g.world.snake = [(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)]
            .into_iter()
            .map(|(x, y)| Cell::new(x, y))
            .collect();
        g.world.obstacles.clear();
        g.world.food = Some(Cell::new(20, 20));
        g.world.direction = Direction::Left;
        g.world.pending = Direction::Down;
        g.world.score = 40;

        let events = g.tick(ms(61_600));
        assert!(events.contains(&GameEvent::GameOver { score: 40 }));
        assert_eq!(g.world.phase, Phase::GameOver);

        let log = g.stats_log();
        assert_eq!(log.len(), 1);
        let s = &log.entries()[0];
        assert_eq!(s.score, 40);
        assert_eq!(s.player_name, "Ada");
        assert_eq!(s.duration_seconds, 62);
        assert_eq!(g.last_session.as_ref(), Some(s));

        let snake = g.world.snake.clone();
        for i in 0..10 {
            assert!(g.frame(ms(200), ms(62_000 + 200 * i)).is_empty());
        }
        assert_eq!(g.world.snake, snake);
        assert!(!g.toggle_pause());

        assert!(g.restart(ms(70_000)));
        assert_eq!(g.world.phase, Phase::Running);
        assert_eq!(g.world.score, 0);
        assert!(g.last_session.is_none());
    }

    #[test]
    fn new_high_score_is_persisted() {
        let mut g = game();
        g.start("p", ms(0));
        let head = g.world.head().unwrap();
        g.world.food = Some(Cell::new(head.x + 1, head.y));
        g.world.obstacles.clear();
        g.tick(ms(120));
        assert_eq!(g.world.high_score, 10);
        assert_eq!(high_score::load(g.store.as_ref()), 10);
    }

    #[test]
    fn high_score_is_read_at_startup() {
        let mut store = MemoryStore::new();
        high_score::save(&mut store, 370);
        let g = Game::with_seed(&GameConfig::default(), Box::new(store), 1);
        assert_eq!(g.world.high_score, 370);
    }

    #[test]
    fn corrupt_stats_do_not_block_game_over() {
        let mut store = MemoryStore::new();
        store.save(STATS_KEY, "][").unwrap();
        let mut g = Game::with_seed(&GameConfig::default(), Box::new(store), 5);
        g.start("p", ms(0));
        let head = g.world.head().unwrap();
        g.world.obstacles = vec![Cell::new(head.x + 1, head.y)];
        g.tick(ms(120));
        assert_eq!(g.world.phase, Phase::GameOver);
        assert_eq!(g.stats_log().len(), 1);
    }

    #[test]
    fn dashboard_and_best_player_read_the_log() {
        let mut g = game();
        assert_eq!(g.best_player(), BestPlayer::NoRecords);
        assert!(g.dashboard().is_empty());
        for (name, score) in [("a", 10), ("b", 30), ("c", 20)] {
            g.start(name, ms(0));
            g.world.score = score;
            let head = g.world.head().unwrap();
            g.world.obstacles = vec![Cell::new(head.x + 1, head.y)];
            g.tick(ms(1_000));
        }
        assert_eq!(g.best_player(), BestPlayer::Player { name: "b".into(), score: 30 });
        let d = g.dashboard();
        assert_eq!(d.kpis.total_games, 3);
        assert_eq!(d.kpis.total_points, 60);
        // Newest first.
        assert_eq!(d.scores.bars[0].value, 20.0);
    }
}
