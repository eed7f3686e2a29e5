//! Tabular Q-learning over grid positions
//!
//! The agent keeps one value per cell of a square grid and learns it with a
//! one-step temporal-difference update:
//!
//! ```text
//! V(s) ← V(s) + α [r + γ max_{n ∈ N(s')} V(n) − V(s)]
//! ```
//!
//! where `N(s')` are the on-grid neighbours of the next state. Greedy moves
//! head for the neighbour with the highest value.
//!
//! ## Usage Example
//!
//! ```
//! use qsnake::adapters::InMemoryStore;
//! use qsnake::q_learning::{AgentConfig, TabularQAgent};
//! use qsnake::types::Position;
//!
//! let config = AgentConfig::new(20)
//!     .with_learning_rate(0.5)    // α
//!     .with_discount_factor(0.25) // γ
//!     .with_exploration_rate(0.25); // ε
//!
//! let mut agent = TabularQAgent::new(config, InMemoryStore::new())?;
//! let action = agent.next_action(Position::new(10, 10));
//! # let _ = action;
//! # Ok::<(), qsnake::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod value_table;

// Public re-exports
pub use agent::{LoadStatus, TabularQAgent};
pub use config::AgentConfig;
pub use value_table::ValueTable;
