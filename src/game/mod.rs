//! Snake game collaborator
//!
//! Produces the per-tick transitions the agent learns from: head position
//! before and after a move, the move outcome and its shaped reward.

pub mod reward;
pub mod snake;

pub use reward::RewardConfig;
pub use snake::{MoveOutcome, SnakeGame};
