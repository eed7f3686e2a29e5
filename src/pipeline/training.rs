//! Training pipeline: the game loop that feeds the agent

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, info, warn};

use crate::{
    Result,
    error::Error,
    game::{MoveOutcome, RewardConfig, SnakeGame},
    ports::Observer,
    q_learning::TabularQAgent,
    types::Transition,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes (games) to play
    pub episodes: usize,

    /// Tick limit per episode; the snake can wander forever otherwise
    pub max_ticks: usize,

    /// Apply value updates after each tick
    pub learn: bool,

    /// Save the table whenever the snake collides with itself
    pub persist_on_game_over: bool,

    /// Reward shaping
    pub rewards: RewardConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            max_ticks: 2_000,
            learn: true,
            persist_on_game_over: true,
            rewards: RewardConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Greedy playback: no updates, no saves.
    pub fn evaluation(episodes: usize, max_ticks: usize) -> Self {
        Self {
            episodes,
            max_ticks,
            learn: false,
            persist_on_game_over: false,
            rewards: RewardConfig::default(),
        }
    }
}

/// What happened during one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode index (0-based)
    pub episode: usize,
    /// Ticks played
    pub ticks: usize,
    /// Food eaten
    pub score: usize,
    /// Sum of rewards fed to the agent
    pub total_reward: f64,
    /// Whether the episode ended by self collision (rather than the tick limit)
    pub collided: bool,
    /// Number of times the head was put back in the centre
    pub wall_resets: usize,
    /// Snake length at the end of the episode
    pub final_length: usize,
}

/// Aggregate result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    pub episodes: usize,
    pub total_ticks: usize,
    pub total_food: usize,
    pub best_score: usize,
    pub collisions: usize,
    pub wall_resets: usize,
    /// Mean of per-episode total reward
    pub mean_reward: f64,
    /// Sample standard deviation of per-episode total reward
    pub reward_std_dev: f64,
    /// Game-over saves that failed (training carried on)
    pub save_failures: usize,
}

impl TrainingResult {
    /// Aggregate per-episode summaries
    pub fn from_episodes(episodes: &[EpisodeSummary], save_failures: usize) -> Self {
        let rewards: Vec<f64> = episodes.iter().map(|e| e.total_reward).collect();
        let mean_reward = if rewards.is_empty() {
            0.0
        } else {
            rewards.iter().mean()
        };
        let reward_std_dev = if rewards.len() < 2 {
            0.0
        } else {
            rewards.iter().std_dev()
        };

        Self {
            episodes: episodes.len(),
            total_ticks: episodes.iter().map(|e| e.ticks).sum(),
            total_food: episodes.iter().map(|e| e.score).sum(),
            best_score: episodes.iter().map(|e| e.score).max().unwrap_or(0),
            collisions: episodes.iter().filter(|e| e.collided).count(),
            wall_resets: episodes.iter().map(|e| e.wall_resets).sum(),
            mean_reward,
            reward_std_dev,
            save_failures,
        }
    }

    /// Average food per episode
    pub fn mean_score(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_food as f64 / self.episodes as f64
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives a [`SnakeGame`] with a [`TabularQAgent`]
///
/// # Examples
///
/// ```
/// use qsnake::adapters::InMemoryStore;
/// use qsnake::game::SnakeGame;
/// use qsnake::pipeline::{TrainingConfig, TrainingPipeline};
/// use qsnake::q_learning::{AgentConfig, TabularQAgent};
///
/// let mut agent = TabularQAgent::new(AgentConfig::new(10).with_seed(1), InMemoryStore::new())?;
/// let mut game = SnakeGame::new(10, Some(1))?;
///
/// let config = TrainingConfig {
///     episodes: 5,
///     max_ticks: 100,
///     ..TrainingConfig::default()
/// };
/// let result = TrainingPipeline::new(config).run(&mut agent, &mut game)?;
/// assert_eq!(result.episodes, 5);
/// # Ok::<(), qsnake::Error>(())
/// ```
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Play every configured episode.
    ///
    /// Each tick: pick a move for the current head, step the game, score the
    /// move and, when learning, update the agent with
    /// `(head_before, action, reward, head_after)`. A self collision ends the
    /// episode and, when enabled, saves the table; a failed save is logged
    /// and counted but does not stop training.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the agent and game grids
    /// differ, or any error raised by an observer or by the value update.
    pub fn run(
        &mut self,
        agent: &mut TabularQAgent,
        game: &mut SnakeGame,
    ) -> Result<TrainingResult> {
        if agent.grid_size() != game.grid_size() {
            return Err(Error::invalid_config(format!(
                "agent grid {} does not match game grid {}",
                agent.grid_size(),
                game.grid_size()
            )));
        }

        let episodes = self.config.episodes;
        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut summaries = Vec::with_capacity(episodes);
        let mut save_failures = 0;

        for episode in 0..episodes {
            game.reset();
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let mut summary = EpisodeSummary {
                episode,
                ticks: 0,
                score: 0,
                total_reward: 0.0,
                collided: false,
                wall_resets: 0,
                final_length: 1,
            };

            for tick in 0..self.config.max_ticks {
                let state = game.head();
                let food = game.food();
                let action = agent.next_action(state);
                let outcome = game.step(action);
                let next_state = game.head();
                let reward = self.config.rewards.score(outcome, state, next_state, food);

                if self.config.learn {
                    agent.update(state, action, reward, next_state)?;
                }

                let transition = Transition {
                    state,
                    action,
                    reward,
                    next_state,
                };
                for observer in &mut self.observers {
                    observer.on_step(episode, tick, &transition, outcome)?;
                }

                summary.ticks += 1;
                summary.total_reward += reward;
                if outcome == MoveOutcome::WallReset {
                    summary.wall_resets += 1;
                }

                if outcome.is_game_over() {
                    summary.collided = true;
                    if self.config.persist_on_game_over {
                        if let Err(err) = agent.save() {
                            warn!(episode, error = %err, "failed to save value table after game over");
                            save_failures += 1;
                        }
                    }
                    break;
                }
            }

            summary.score = game.score();
            summary.final_length = game.len();
            debug!(
                episode,
                ticks = summary.ticks,
                score = summary.score,
                reward = summary.total_reward,
                collided = summary.collided,
                "episode finished"
            );

            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
            summaries.push(summary);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_episodes(&summaries, save_failures);
        info!(
            episodes = result.episodes,
            total_food = result.total_food,
            best_score = result.best_score,
            mean_reward = result.mean_reward,
            "training run complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryStore, q_learning::AgentConfig};

    fn summary(episode: usize, score: usize, total_reward: f64, collided: bool) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            ticks: 10,
            score,
            total_reward,
            collided,
            wall_resets: 1,
            final_length: score + 1,
        }
    }

    #[test]
    fn test_result_aggregates_episodes() {
        let episodes = vec![
            summary(0, 2, 10.0, true),
            summary(1, 0, 20.0, false),
            summary(2, 4, 30.0, true),
        ];
        let result = TrainingResult::from_episodes(&episodes, 1);

        assert_eq!(result.episodes, 3);
        assert_eq!(result.total_ticks, 30);
        assert_eq!(result.total_food, 6);
        assert_eq!(result.best_score, 4);
        assert_eq!(result.collisions, 2);
        assert_eq!(result.wall_resets, 3);
        assert_eq!(result.save_failures, 1);
        assert!((result.mean_reward - 20.0).abs() < 1e-12);
        assert!((result.reward_std_dev - 10.0).abs() < 1e-12);
        assert!((result.mean_score() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_result_has_zero_stats() {
        let result = TrainingResult::from_episodes(&[], 0);
        assert_eq!(result.mean_reward, 0.0);
        assert_eq!(result.reward_std_dev, 0.0);
        assert_eq!(result.mean_score(), 0.0);
    }

    #[test]
    fn test_grid_mismatch_is_rejected() {
        let mut agent =
            TabularQAgent::new(AgentConfig::new(8), InMemoryStore::new()).unwrap();
        let mut game = SnakeGame::new(10, Some(0)).unwrap();
        let result = TrainingPipeline::new(TrainingConfig::default()).run(&mut agent, &mut game);
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_evaluation_leaves_table_untouched() {
        let store = InMemoryStore::new();
        let mut agent = TabularQAgent::new(
            AgentConfig::new(10).with_exploration_rate(0.0).with_seed(4),
            store.clone(),
        )
        .unwrap();
        let mut game = SnakeGame::new(10, Some(4)).unwrap();
        let before = agent.table().clone();

        let result = TrainingPipeline::new(TrainingConfig::evaluation(3, 50))
            .run(&mut agent, &mut game)
            .unwrap();

        assert_eq!(result.episodes, 3);
        assert_eq!(agent.table(), &before);
        assert!(store.is_empty());
    }
}
