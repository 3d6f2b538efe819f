use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::point::Point;

const MAX_PLACEMENT_TRIES: u32 = 1000;
const FALLBACK_CELL: Point = Point::new(1, 1);

/// The single fruit on the board. Owns its RNG; callers supply the
/// occupancy predicate so this module knows nothing about the snake.
pub struct Fruit {
    width: i32,
    height: i32,
    position: Point,
    rng: StdRng,
}

impl Fruit {
    pub fn new(width: i32, height: i32) -> Self {
        Fruit { width, height, position: FALLBACK_CELL, rng: StdRng::from_entropy() }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Moves the fruit to a random free cell strictly inside the wall
    /// ring. Retries are capped so a nearly-full board cannot hang the
    /// tick; on exhaustion the fruit lands on (1, 1) even if occupied.
    pub fn respawn<F>(&mut self, is_occupied: F)
    where
        F: Fn(Point) -> bool,
    {
        for _ in 0..MAX_PLACEMENT_TRIES {
            let candidate = Point::new(
                self.rng.gen_range(1..self.width - 1),
                self.rng.gen_range(1..self.height - 1),
            );
            if !is_occupied(candidate) {
                self.position = candidate;
                return;
            }
        }
        self.position = FALLBACK_CELL;
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, position: Point) {
        self.position = position;
    }
}
