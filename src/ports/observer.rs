//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing game-loop events, allowing
//! composable data collection without coupling the training loop to
//! specific output formats or metrics.

use crate::{Result, game::MoveOutcome, pipeline::EpisodeSummary, types::Transition};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each tick of the game
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```
/// use qsnake::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct FoodCounter {
///     eaten: usize,
/// }
///
/// impl Observer for FoodCounter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> qsnake::Result<()> {
///         self.eaten += summary.score;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (0-based index).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every tick with the transition fed to the agent.
    ///
    /// The transition is reported even when learning is disabled.
    fn on_step(
        &mut self,
        _episode: usize,
        _tick: usize,
        _transition: &Transition,
        _outcome: MoveOutcome,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, by collision or by reaching the tick limit.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, flush files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
