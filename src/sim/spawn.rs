/// Random placement of food and obstacles by rejection sampling.

use rand::Rng;

use crate::domain::cell::Cell;
use super::world::World;

fn random_cell<R: Rng>(rng: &mut R, size: i32) -> Cell {
    Cell::new(rng.gen_range(0..size), rng.gen_range(0..size))
}

/// Place food on a uniformly random cell that is neither snake nor obstacle.
///
/// Retries until it hits; a grid with no open cell at all leaves `food`
/// empty instead of spinning forever.
pub fn spawn_food<R: Rng>(world: &mut World, rng: &mut R) -> Option<Cell> {
    if world.snake.len() + world.obstacles.len() >= world.cell_count() {
        world.food = None;
        return None;
    }
    loop {
        let c = random_cell(rng, world.size);
        if world.is_open(c) {
            world.food = Some(c);
            return Some(c);
        }
    }
}

/// Add one obstacle on a free cell (not snake, food, or obstacle).
///
/// At most `size²` attempts; returns None and places nothing when they
/// all miss.
pub fn spawn_obstacle<R: Rng>(world: &mut World, rng: &mut R) -> Option<Cell> {
    for _ in 0..world.cell_count() {
        let c = random_cell(rng, world.size);
        if world.is_free(c) {
            world.obstacles.push(c);
            return Some(c);
        }
    }
    None
}
