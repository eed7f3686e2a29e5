//! Reward shaping for the Snake game loop.

use serde::{Deserialize, Serialize};

use super::snake::MoveOutcome;
use crate::types::Position;

/// Reward assigned to each kind of step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Head landed on the food
    pub food: f64,
    /// Head ran into the body
    pub collision: f64,
    /// Head moved strictly closer to the food
    pub closer: f64,
    /// Head did not get closer
    pub farther: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            food: 10_000.0,
            collision: -20.0,
            closer: 1.0,
            farther: -3.0,
        }
    }
}

impl RewardConfig {
    /// Reward for a move from `head_before` to `head_after`.
    ///
    /// `food` is the food position before the move; eating respawns it.
    pub fn score(
        &self,
        outcome: MoveOutcome,
        head_before: Position,
        head_after: Position,
        food: Position,
    ) -> f64 {
        match outcome {
            MoveOutcome::Ate => self.food,
            MoveOutcome::SelfCollision => self.collision,
            MoveOutcome::Continue | MoveOutcome::WallReset => {
                if head_after.distance(food) < head_before.distance(food) {
                    self.closer
                } else {
                    self.farther
                }
            }
        }
    }
}
