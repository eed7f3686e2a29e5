//! Headless Snake engine.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    types::{Action, Position},
};

/// Result of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Ordinary step
    Continue,
    /// The head landed on the food; the snake grows on the next step
    Ate,
    /// The head left the playable area and was put back in the centre
    WallReset,
    /// The head ran into the body. Ends the game.
    SelfCollision,
}

impl MoveOutcome {
    pub fn is_game_over(self) -> bool {
        matches!(self, MoveOutcome::SelfCollision)
    }
}

/// Snake on a square grid with a single piece of food.
///
/// The playable area is the interior `[1, grid_size - 2]` on both axes; a
/// head that reaches the border row or column is relocated to the centre.
/// Food is placed with each coordinate in `[1, grid_size - 3]`.
#[derive(Debug, Clone)]
pub struct SnakeGame {
    grid_size: usize,
    body: VecDeque<Position>,
    food: Position,
    pending_growth: usize,
    score: usize,
    rng: StdRng,
}

impl SnakeGame {
    /// Smallest grid with a non-empty food range.
    pub const MIN_GRID_SIZE: usize = 4;

    /// Create a game with a single-segment snake in the centre.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `grid_size` is below
    /// [`SnakeGame::MIN_GRID_SIZE`] or too large for grid coordinates.
    pub fn new(grid_size: usize, seed: Option<u64>) -> Result<Self> {
        if grid_size < Self::MIN_GRID_SIZE || i32::try_from(grid_size).is_err() {
            return Err(Error::invalid_config(format!(
                "snake grid_size must be between {} and {}, got {grid_size}",
                Self::MIN_GRID_SIZE,
                i32::MAX
            )));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut game = Self {
            grid_size,
            body: VecDeque::new(),
            food: Position::default(),
            pending_growth: 0,
            score: 0,
            rng,
        };
        game.reset();
        Ok(game)
    }

    /// Back to a single segment in the centre with fresh food.
    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push_back(self.center());
        self.pending_growth = 0;
        self.score = 0;
        self.spawn_food();
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn head(&self) -> Position {
        self.body.front().copied().unwrap_or_else(|| self.center())
    }

    pub fn food(&self) -> Position {
        self.food
    }

    /// Segments from head to tail.
    pub fn body(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Food eaten since the last reset.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Advance the snake one cell.
    ///
    /// The collision check runs before the tail moves, so stepping onto the
    /// current tail cell counts as a collision.
    pub fn step(&mut self, action: Action) -> MoveOutcome {
        let mut head = self.head() + action;
        let mut outcome = MoveOutcome::Continue;

        if !self.is_playable(head) {
            head = self.center();
            outcome = MoveOutcome::WallReset;
        }

        if self.body.contains(&head) {
            self.body.push_front(head);
            return MoveOutcome::SelfCollision;
        }
        self.body.push_front(head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop_back();
        }

        if head == self.food {
            self.pending_growth += 1;
            self.score += 1;
            self.spawn_food();
            outcome = MoveOutcome::Ate;
        }

        outcome
    }

    fn center(&self) -> Position {
        // grid_size fits in i32 (checked in new)
        let mid = (self.grid_size / 2) as i32;
        Position::new(mid, mid)
    }

    fn is_playable(&self, pos: Position) -> bool {
        let last = self.grid_size as i32 - 1;
        pos.x > 0 && pos.x < last && pos.y > 0 && pos.y < last
    }

    fn spawn_food(&mut self) {
        let upper = self.grid_size as i32 - 3;
        self.food = Position::new(
            self.rng.random_range(1..=upper),
            self.rng.random_range(1..=upper),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> SnakeGame {
        SnakeGame::new(10, Some(3)).unwrap()
    }

    #[test]
    fn test_rejects_tiny_grid() {
        assert!(SnakeGame::new(3, None).is_err());
        assert!(SnakeGame::new(4, None).is_ok());
    }

    #[test]
    fn test_starts_in_center() {
        let game = game();
        assert_eq!(game.head(), Position::new(5, 5));
        assert_eq!(game.len(), 1);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_food_stays_in_spawn_range() {
        let mut game = SnakeGame::new(6, Some(11)).unwrap();
        for _ in 0..200 {
            let food = game.food();
            assert!((1..=3).contains(&food.x), "food x out of range: {food}");
            assert!((1..=3).contains(&food.y), "food y out of range: {food}");
            game.reset();
        }
    }

    #[test]
    fn test_step_moves_head() {
        let mut game = game();
        game.food = Position::new(1, 1);
        assert_eq!(game.step(Action::Right), MoveOutcome::Continue);
        assert_eq!(game.head(), Position::new(6, 5));
        assert_eq!(game.len(), 1);
    }

    #[test]
    fn test_border_relocates_to_center() {
        let mut game = game();
        game.food = Position::new(1, 1);
        game.body = VecDeque::from([Position::new(8, 5)]);

        assert_eq!(game.step(Action::Right), MoveOutcome::WallReset);
        assert_eq!(game.head(), Position::new(5, 5));
        assert!(!game.step(Action::Up).is_game_over());
    }

    #[test]
    fn test_eating_grows_on_next_step() {
        let mut game = game();
        game.food = Position::new(6, 5);

        assert_eq!(game.step(Action::Right), MoveOutcome::Ate);
        assert_eq!(game.score(), 1);
        assert_eq!(game.len(), 1);

        game.food = Position::new(1, 1);
        game.step(Action::Right);
        assert_eq!(game.len(), 2);
        assert_eq!(game.body().copied().collect::<Vec<_>>(), vec![
            Position::new(7, 5),
            Position::new(6, 5)
        ]);
    }

    #[test]
    fn test_reversing_into_neck_is_collision() {
        let mut game = game();
        game.food = Position::new(1, 1);
        game.body = VecDeque::from([Position::new(5, 5), Position::new(4, 5)]);

        let outcome = game.step(Action::Left);
        assert_eq!(outcome, MoveOutcome::SelfCollision);
        assert!(outcome.is_game_over());
    }

    #[test]
    fn test_single_segment_can_reverse() {
        let mut game = game();
        game.food = Position::new(1, 1);
        game.step(Action::Right);
        assert_eq!(game.step(Action::Left), MoveOutcome::Continue);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut game = game();
        game.body = VecDeque::from([Position::new(3, 3), Position::new(3, 4)]);
        game.score = 4;
        game.reset();
        assert_eq!(game.head(), Position::new(5, 5));
        assert_eq!(game.len(), 1);
        assert_eq!(game.score(), 0);
    }
}
