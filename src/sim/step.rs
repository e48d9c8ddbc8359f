/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Commit the pending direction
///   2. Compute the wrapped new head
///   3. Body collision (tail included, it has not moved yet)
///   4. Obstacle collision
///   5. Push the new head
///   6. Food: effect, score, obstacle, high score, new food
///      otherwise: drop the tail
///
/// Reversal is filtered when the input arrives (see `steer`), so the
/// commit in (1) is unconditional.

use std::time::Duration;

use rand::Rng;

use crate::domain::cell::Cell;
use super::event::{Collision, GameEvent};
use super::spawn;
use super::world::{CollectEffect, Phase, World};

pub fn step<R: Rng>(world: &mut World, rng: &mut R, now: Duration) -> Vec<GameEvent> {
    if world.phase != Phase::Running { return vec![]; }
    let head = match world.head() {
        Some(h) => h,
        None => return vec![],
    };

    let mut events = Vec::new();
    world.tick += 1;

    world.direction = world.pending;
    let new_head = head.step(world.direction, world.size);

    if let Some(with) = collision_at(world, new_head) {
        world.phase = Phase::GameOver;
        events.push(GameEvent::Collided { at: new_head, with });
        events.push(GameEvent::GameOver { score: world.score });
        return events;
    }

    world.snake.push_front(new_head);

    if world.food == Some(new_head) {
        eat(world, rng, new_head, now, &mut events);
    } else {
        world.snake.pop_back();
    }

    events
}

fn collision_at(world: &World, c: Cell) -> Option<Collision> {
    if world.snake_contains(c) {
        Some(Collision::Body)
    } else if world.obstacle_at(c) {
        Some(Collision::Obstacle)
    } else {
        None
    }
}

fn eat<R: Rng>(world: &mut World, rng: &mut R, at: Cell, now: Duration, events: &mut Vec<GameEvent>) {
    world.effects.push(CollectEffect { origin: at.pixel_center(), started: now });
    world.score += world.points_per_food;
    events.push(GameEvent::FoodEaten { at, score: world.score });

    // Food still sits on `at` here, so the obstacle cannot land on it.
    match spawn::spawn_obstacle(world, rng) {
        Some(c) => events.push(GameEvent::ObstacleSpawned { at: c }),
        None => events.push(GameEvent::ObstacleSkipped),
    }

    if world.score > world.high_score {
        world.high_score = world.score;
        events.push(GameEvent::NewHighScore { score: world.score });
    }

    spawn::spawn_food(world, rng);
}
