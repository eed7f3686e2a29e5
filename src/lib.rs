//! Snake driven by a tabular Q-learning agent
//!
//! This crate provides:
//! - A value-table agent with epsilon-greedy move selection and one-step updates
//! - Pluggable persistence for the learned table (JSON file, in-memory)
//! - A headless Snake engine and shaped rewards to train against
//! - A training pipeline with composable observers and a CLI

pub mod adapters;
pub mod cli;
pub mod error;
pub mod game;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use q_learning::{AgentConfig, LoadStatus, TabularQAgent, ValueTable};
pub use types::{Action, Position, Transition};
