use std::collections::VecDeque;

use crate::point::Point;
use Direction::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

pub struct Snake {
    body: VecDeque<Point>,
    direction: Direction,
}

impl Snake {
    /// Seeds a straight horizontal snake: head at `head`, body extending
    /// to the left, heading Right.
    pub fn new(head: Point, length: usize) -> Self {
        debug_assert!(length >= 1);
        let body = (0..length as i32)
            .map(|i| Point::new(head.x - i, head.y))
            .collect();
        Snake { body, direction: Right }
    }

    /// Builds a snake from explicit segments, head first.
    pub fn from_segments(segments: Vec<Point>, direction: Direction) -> Self {
        debug_assert!(!segments.is_empty());
        Snake { body: VecDeque::from(segments), direction }
    }

    pub fn head(&self) -> Point {
        *self.body.front().unwrap()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Updates the heading unless the request is an exact reversal, which
    /// would walk the head straight into the neck. Reversals are ignored
    /// silently; pressing the wrong key is a normal user action.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            return;
        }
        self.direction = direction;
    }

    /// The cell the head would occupy after one step. Pure; the collision
    /// resolver calls this before committing anything.
    pub fn next_head(&self) -> Point {
        let head = self.head();
        let (dx, dy) = self.direction.delta();
        Point::new(head.x + dx, head.y + dy)
    }

    /// Commits one step: new head at the front, tail dropped unless
    /// growing. Returns the vacated tail cell so the renderer can erase it.
    pub fn advance(&mut self, grow: bool) -> Option<Point> {
        let new_head = self.next_head();
        self.body.push_front(new_head);
        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }

    /// Occupancy test for a prospective head against the current body.
    /// The tail cell counts even though it is about to be vacated.
    pub fn hits_self(&self, point: Point) -> bool {
        self.contains(point)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.body.contains(&point)
    }
}
