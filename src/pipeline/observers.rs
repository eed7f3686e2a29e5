//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the game loop to specific output formats.

use std::{
    fs::File,
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use super::training::EpisodeSummary;
use crate::{Result, error::Error, game::MoveOutcome, ports::Observer, types::Transition};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    food: usize,
    best: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            food: 0,
            best: 0,
        }
    }

    fn message(&self) -> String {
        format!("food:{} best:{}", self.food, self.best)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.food += summary.score;
        self.best = self.best.max(summary.score);

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome counts and episode lengths
#[derive(Default)]
pub struct MetricsObserver {
    episodes: usize,
    ticks: usize,
    food: usize,
    collisions: usize,
    wall_resets: usize,
    episode_lengths: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of episodes that ended in a self collision
    pub fn collision_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.collisions as f64 / self.episodes as f64
        }
    }

    /// Average ticks per episode
    pub fn avg_episode_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().map(|&len| len as f64).mean()
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            ticks: self.ticks,
            food: self.food,
            collisions: self.collisions,
            wall_resets: self.wall_resets,
            collision_rate: self.collision_rate(),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub ticks: usize,
    pub food: usize,
    pub collisions: usize,
    pub wall_resets: usize,
    pub collision_rate: f64,
    pub avg_episode_length: f64,
}

impl Observer for MetricsObserver {
    fn on_step(
        &mut self,
        _episode: usize,
        _tick: usize,
        _transition: &Transition,
        outcome: MoveOutcome,
    ) -> Result<()> {
        self.ticks += 1;
        match outcome {
            MoveOutcome::Ate => self.food += 1,
            MoveOutcome::SelfCollision => self.collisions += 1,
            MoveOutcome::WallReset => self.wall_resets += 1,
            MoveOutcome::Continue => {}
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        self.episode_lengths.push(summary.ticks);
        Ok(())
    }
}

/// Observer behind a shared handle, so the caller can read it back after
/// the pipeline has taken ownership of the boxed observer.
pub struct SharedObserver<T> {
    inner: Arc<Mutex<T>>,
}

impl<T: Observer> SharedObserver<T> {
    pub fn new(observer: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    /// Get a clone of the shared observer reference
    pub fn clone_ref(&self) -> Arc<Mutex<T>> {
        Arc::clone(&self.inner)
    }

    fn with<R>(&self, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let mut guard = self.inner.lock().map_err(|_| Error::Io {
            operation: "access shared observer".to_string(),
            source: std::io::Error::other("observer lock poisoned"),
        })?;
        f(&mut guard)
    }
}

impl<T: Observer> Observer for SharedObserver<T> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.with(|o| o.on_training_start(total_episodes))
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.with(|o| o.on_episode_start(episode))
    }

    fn on_step(
        &mut self,
        episode: usize,
        tick: usize,
        transition: &Transition,
        outcome: MoveOutcome,
    ) -> Result<()> {
        self.with(|o| o.on_step(episode, tick, transition, outcome))
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.with(|o| o.on_episode_end(summary))
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.with(|o| o.on_training_end())
    }
}

/// CSV observer - Writes one row per episode
pub struct CsvObserver {
    writer: csv::Writer<File>,
}

impl CsvObserver {
    /// Create a new CSV observer writing to `path` (truncates existing files)
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let writer = csv::Writer::from_path(path)?;
        Ok(Self { writer })
    }
}

impl Observer for CsvObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.writer.serialize(summary)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
