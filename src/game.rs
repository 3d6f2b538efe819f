use crate::fruit::Fruit;
use crate::point::Point;
use crate::snake::{Direction, Snake};

pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const FRUIT_REWARD: u32 = 10;

/// Outcome of one committed tick, with enough detail for the renderer to
/// repaint only the cells that changed.
pub enum StepResult {
    Moved {
        new_head: Point,
        old_head: Point,
        old_tail: Option<Point>,
        ate: bool,
    },
    Crashed,
}

/// One run's worth of simulation state: board bounds, snake, fruit, score
/// and flags. No terminal I/O happens here.
pub struct GameState {
    width: i32,
    height: i32,
    snake: Snake,
    fruit: Fruit,
    score: u32,
    high_score: u32,
    over: bool,
}

impl GameState {
    pub fn new(width: i32, height: i32, high_score: u32) -> Self {
        let snake = Snake::new(Point::new(width / 2, height / 2), INITIAL_SNAKE_LENGTH);
        let mut fruit = Fruit::new(width, height);
        fruit.respawn(|p| snake.contains(p));
        GameState { width, height, snake, fruit, score: 0, high_score, over: false }
    }

    /// Starts a fresh run. The high score carries over.
    pub fn reset(&mut self) {
        self.snake = Snake::new(
            Point::new(self.width / 2, self.height / 2),
            INITIAL_SNAKE_LENGTH,
        );
        let snake = &self.snake;
        self.fruit.respawn(|p| snake.contains(p));
        self.score = 0;
        self.over = false;
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn fruit_position(&self) -> Point {
        self.fruit.position()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn over(&self) -> bool {
        self.over
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.snake.set_direction(direction);
    }

    fn hits_wall(&self, p: Point) -> bool {
        p.x <= 0 || p.x >= self.width - 1 || p.y <= 0 || p.y >= self.height - 1
    }

    /// One simulation tick. Collision checks run against the pre-move body
    /// and nothing is mutated on a crash; growth and score are applied
    /// before the fruit respawns so the respawn predicate sees the
    /// soon-to-be occupied set.
    pub fn step(&mut self) -> StepResult {
        debug_assert!(!self.over);

        let next = self.snake.next_head();

        if self.hits_wall(next) || self.snake.hits_self(next) {
            self.over = true;
            return StepResult::Crashed;
        }

        let ate = next == self.fruit.position();
        if ate {
            self.score += FRUIT_REWARD;
            if self.score > self.high_score {
                self.high_score = self.score;
            }
            let snake = &self.snake;
            self.fruit.respawn(|p| snake.contains(p) || p == next);
        }

        let old_head = self.snake.head();
        let old_tail = self.snake.advance(ate);
        StepResult::Moved { new_head: next, old_head, old_tail, ate }
    }

    #[cfg(test)]
    pub(crate) fn place_fruit(&mut self, position: Point) {
        self.fruit.place_at(position);
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }
}

#[cfg(test)]
mod tests {
    use super::{GameState, StepResult, FRUIT_REWARD};
    use crate::point::Point;
    use crate::snake::{Direction, Snake};

    /// 10x10 board with the fruit parked out of the snake's path.
    fn state() -> GameState {
        let mut state = GameState::new(10, 10, 0);
        state.place_fruit(Point::new(8, 8));
        state
    }

    fn body(state: &GameState) -> Vec<Point> {
        state.snake().segments().copied().collect()
    }

    /// Puts the fruit on the snake's next cell and ticks once.
    fn eat_once(state: &mut GameState) {
        state.place_fruit(state.snake().next_head());
        match state.step() {
            StepResult::Moved { ate, .. } => assert!(ate),
            StepResult::Crashed => panic!("unexpected crash while eating"),
        }
        state.place_fruit(Point::new(8, 8));
    }

    #[test]
    fn plain_tick_moves_head_and_drops_tail() {
        let mut state = state();

        match state.step() {
            StepResult::Moved { new_head, old_head, old_tail, ate } => {
                assert_eq!(new_head, Point::new(6, 5));
                assert_eq!(old_head, Point::new(5, 5));
                assert_eq!(old_tail, Some(Point::new(3, 5)));
                assert!(!ate);
            }
            StepResult::Crashed => panic!("unexpected crash"),
        }
        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.snake().head(), Point::new(6, 5));
        assert!(!state.over());
    }

    #[test]
    fn eating_fruit_grows_and_scores() {
        let mut state = state();
        state.place_fruit(Point::new(6, 5));

        match state.step() {
            StepResult::Moved { old_tail, ate, .. } => {
                assert!(ate);
                assert_eq!(old_tail, None);
            }
            StepResult::Crashed => panic!("unexpected crash"),
        }

        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.score(), FRUIT_REWARD);
        assert_eq!(state.high_score(), FRUIT_REWARD);
        // The respawned fruit is never on the snake.
        assert!(!state.snake().contains(state.fruit_position()));
    }

    #[test]
    fn wall_collision_on_all_four_sides() {
        let cases = vec![
            (vec![Point::new(8, 5), Point::new(7, 5)], Direction::Right),
            (vec![Point::new(1, 5), Point::new(2, 5)], Direction::Left),
            (vec![Point::new(5, 1), Point::new(5, 2)], Direction::Up),
            (vec![Point::new(5, 8), Point::new(5, 7)], Direction::Down),
        ];

        for (segments, direction) in cases {
            let mut state = state();
            state.set_snake(Snake::from_segments(segments.clone(), direction));

            match state.step() {
                StepResult::Crashed => {}
                StepResult::Moved { .. } => panic!("expected crash heading {:?}", direction),
            }
            assert!(state.over());
            // Nothing was committed.
            assert_eq!(body(&state), segments);
        }
    }

    #[test]
    fn interior_cell_does_not_trigger_wall_check() {
        let mut state = state();
        state.set_snake(Snake::from_segments(
            vec![Point::new(4, 4), Point::new(3, 4)],
            Direction::Right,
        ));

        match state.step() {
            StepResult::Moved { new_head, .. } => assert_eq!(new_head, Point::new(5, 4)),
            StepResult::Crashed => panic!("unexpected crash in the interior"),
        }
        assert!(!state.over());
    }

    #[test]
    fn self_collision_with_a_mid_body_segment() {
        let mut state = state();
        state.set_snake(Snake::from_segments(
            vec![
                Point::new(3, 3),
                Point::new(4, 3),
                Point::new(4, 4),
                Point::new(3, 4),
                Point::new(2, 4),
            ],
            Direction::Down,
        ));
        let before = body(&state);

        match state.step() {
            StepResult::Crashed => {}
            StepResult::Moved { .. } => panic!("expected self collision"),
        }
        assert!(state.over());
        assert_eq!(body(&state), before);
    }

    #[test]
    fn stepping_into_the_vacating_tail_cell_still_crashes() {
        // Length 4, coiled so the next head is the current tail. The tail
        // would move away this very tick, but the pre-move body is the
        // ground truth.
        let mut state = state();
        state.set_snake(Snake::from_segments(
            vec![
                Point::new(4, 6),
                Point::new(5, 6),
                Point::new(5, 5),
                Point::new(4, 5),
            ],
            Direction::Up,
        ));

        match state.step() {
            StepResult::Crashed => {}
            StepResult::Moved { .. } => panic!("expected crash into the tail cell"),
        }
        assert!(state.over());
    }

    #[test]
    fn score_increases_by_the_fixed_reward_per_fruit() {
        let mut state = state();

        eat_once(&mut state);
        eat_once(&mut state);

        assert_eq!(state.score(), 2 * FRUIT_REWARD);
    }

    #[test]
    fn high_score_survives_reset_and_only_improves() {
        let mut state = GameState::new(10, 10, 25);
        state.place_fruit(Point::new(8, 8));

        eat_once(&mut state);
        assert_eq!(state.score(), FRUIT_REWARD);
        assert_eq!(state.high_score(), 25);

        eat_once(&mut state);
        eat_once(&mut state);
        assert_eq!(state.score(), 30);
        assert_eq!(state.high_score(), 30);

        state.reset();
        assert_eq!(state.score(), 0);
        assert!(!state.over());
        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.high_score(), 30);
    }

    #[test]
    fn reset_respawns_fruit_off_the_snake() {
        let mut state = state();
        state.reset();

        assert!(!state.snake().contains(state.fruit_position()));
        let p = state.fruit_position();
        assert!(p.x >= 1 && p.x <= 8 && p.y >= 1 && p.y <= 8);
    }

    #[test]
    fn run_ends_one_cell_from_the_right_wall() {
        let mut state = state();

        // Head starts at (5, 5); three safe steps reach x = 8, one short
        // of the wall at x = 9.
        for _ in 0..3 {
            match state.step() {
                StepResult::Moved { .. } => {}
                StepResult::Crashed => panic!("crashed early"),
            }
        }
        assert_eq!(state.snake().head(), Point::new(8, 5));

        match state.step() {
            StepResult::Crashed => {}
            StepResult::Moved { .. } => panic!("expected wall crash"),
        }
        assert!(state.over());
        assert_eq!(
            body(&state),
            vec![Point::new(8, 5), Point::new(7, 5), Point::new(6, 5)]
        );
    }
}
