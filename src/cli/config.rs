//! Session configuration shared across CLI commands
//!
//! Values come from defaults, then an optional JSON file, then command-line
//! flags, each layer overriding the previous one.

use std::{fs::File, io::BufReader, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    game::RewardConfig,
    pipeline::TrainingConfig,
    q_learning::AgentConfig,
};

/// Settings for one training or playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Side length of the grid
    pub grid_size: usize,

    /// α
    pub learning_rate: f64,

    /// γ
    pub discount_factor: f64,

    /// ε
    pub exploration_rate: f64,

    /// Random seed for reproducibility
    pub seed: Option<u64>,

    /// Where the value table is stored
    pub table: PathBuf,

    /// Number of episodes
    pub episodes: usize,

    /// Tick limit per episode
    pub max_ticks: usize,

    /// Reward shaping
    pub rewards: RewardConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let agent = AgentConfig::default();
        let training = TrainingConfig::default();
        Self {
            grid_size: agent.grid_size,
            learning_rate: agent.learning_rate,
            discount_factor: agent.discount_factor,
            exploration_rate: agent.exploration_rate,
            seed: None,
            table: PathBuf::from("qTable.json"),
            episodes: training.episodes,
            max_ticks: training.max_ticks,
            rewards: training.rewards,
        }
    }
}

impl SessionConfig {
    /// Read a session file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open session config {path:?}"),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Defaults, or the file's contents when a path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn agent_config(&self) -> AgentConfig {
        let config = AgentConfig::new(self.grid_size)
            .with_learning_rate(self.learning_rate)
            .with_discount_factor(self.discount_factor)
            .with_exploration_rate(self.exploration_rate);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            episodes: self.episodes,
            max_ticks: self.max_ticks,
            rewards: self.rewards,
            ..TrainingConfig::default()
        }
    }
}
