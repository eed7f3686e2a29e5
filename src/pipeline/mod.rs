//! Training and evaluation pipeline
//!
//! This module provides the game loop that connects a [`SnakeGame`] to a
//! [`TabularQAgent`], plus observers for recording what happens:
//! - Training with per-tick value updates and save-on-game-over
//! - Greedy evaluation with learning switched off
//! - Progress, metrics and CSV history observers
//!
//! [`SnakeGame`]: crate::game::SnakeGame
//! [`TabularQAgent`]: crate::q_learning::TabularQAgent

pub mod observers;
pub mod training;

pub use observers::{
    CsvObserver, MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver,
};
pub use training::{EpisodeSummary, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
