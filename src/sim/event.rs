/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

use crate::domain::cell::Cell;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Collision {
    Body,
    Obstacle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { at: Cell, score: u32 },
    ObstacleSpawned { at: Cell },
    /// No free cell was found for the new obstacle.
    ObstacleSkipped,
    NewHighScore { score: u32 },
    Collided { at: Cell, with: Collision },
    GameOver { score: u32 },
}
