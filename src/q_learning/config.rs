//! Configuration for the tabular agent.

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error};

/// Hyper-parameters of a [`TabularQAgent`](super::TabularQAgent).
///
/// Fixed for the lifetime of the agent: there is no exploration annealing.
///
/// # Examples
///
/// ```
/// use qsnake::q_learning::AgentConfig;
///
/// let config = AgentConfig::new(20)
///     .with_learning_rate(0.5)
///     .with_discount_factor(0.25)
///     .with_exploration_rate(0.1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Side length of the square value table
    pub grid_size: usize,
    /// α, in [0, 1]
    pub learning_rate: f64,
    /// γ, in [0, 1]
    pub discount_factor: f64,
    /// ε for epsilon-greedy selection, in [0, 1]
    pub exploration_rate: f64,
    /// Seed for the agent's own RNG (None = non-deterministic)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub const DEFAULT_GRID_SIZE: usize = 20;
    pub const DEFAULT_LEARNING_RATE: f64 = 0.5;
    pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.25;
    pub const DEFAULT_EXPLORATION_RATE: f64 = 0.25;

    /// Create a configuration for the given grid size with default rates.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            learning_rate: Self::DEFAULT_LEARNING_RATE,
            discount_factor: Self::DEFAULT_DISCOUNT_FACTOR,
            exploration_rate: Self::DEFAULT_EXPLORATION_RATE,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_exploration_rate(mut self, exploration_rate: f64) -> Self {
        self.exploration_rate = exploration_rate;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the grid size and that every rate is a finite value in [0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::invalid_config("grid_size must be at least 1"));
        }
        if i32::try_from(self.grid_size).is_err() {
            return Err(Error::invalid_config(format!(
                "grid_size {} does not fit grid coordinates",
                self.grid_size
            )));
        }

        for (name, value) in [
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
            ("exploration_rate", self.exploration_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AgentConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.learning_rate, 0.5);
        assert_eq!(config.discount_factor, 0.25);
        assert_eq!(config.exploration_rate, 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_grid_rejected() {
        let err = AgentConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rates_outside_unit_interval_rejected() {
        assert!(AgentConfig::new(5).with_learning_rate(1.5).validate().is_err());
        assert!(AgentConfig::new(5).with_discount_factor(-0.1).validate().is_err());
        assert!(
            AgentConfig::new(5)
                .with_exploration_rate(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_boundary_rates_accepted() {
        let config = AgentConfig::new(1)
            .with_learning_rate(0.0)
            .with_discount_factor(1.0)
            .with_exploration_rate(1.0);
        assert!(config.validate().is_ok());
    }
}
