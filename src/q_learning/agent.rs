//! Tabular Q-learning agent
//!
//! The table holds one value per grid cell rather than one per
//! (cell, action) pair: every move into a cell shares that cell's score, and
//! the update writes to the cell the agent was in. The state is the raw head
//! position; food and body are not part of it.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    Result,
    ports::TableStore,
    q_learning::{config::AgentConfig, value_table::ValueTable},
    types::{Action, Position},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// What [`TabularQAgent::load`] found in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// A table of the configured size was restored
    Restored,
    /// The store held nothing; the table was zeroed
    Missing,
    /// The payload was unreadable, malformed or the wrong size; the table was zeroed
    Corrupt,
}

/// Epsilon-greedy agent over a position-indexed value table.
///
/// # Examples
///
/// ```
/// use qsnake::adapters::InMemoryStore;
/// use qsnake::q_learning::{AgentConfig, TabularQAgent};
/// use qsnake::types::{Action, Position};
///
/// let config = AgentConfig::new(5).with_seed(7);
/// let mut agent = TabularQAgent::new(config, InMemoryStore::new())?;
///
/// agent.update(Position::new(2, 2), Action::Right, 10.0, Position::new(2, 2))?;
/// assert_eq!(agent.value_at(Position::new(2, 2))?, 5.0);
///
/// agent.save()?;
/// # Ok::<(), qsnake::Error>(())
/// ```
pub struct TabularQAgent {
    config: AgentConfig,
    table: ValueTable,
    store: Box<dyn TableStore + Send>,
    rng: StdRng,
    load_status: LoadStatus,
}

impl TabularQAgent {
    /// Create an agent and restore its table from `store`.
    ///
    /// A missing or unreadable table is not an error: the agent starts from
    /// a zero-filled table instead.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `config` fails
    /// [`AgentConfig::validate`].
    pub fn new<S: TableStore + Send + 'static>(config: AgentConfig, store: S) -> Result<Self> {
        config.validate()?;

        let mut agent = Self {
            table: ValueTable::zeros(config.grid_size),
            rng: build_rng(config.seed),
            config,
            store: Box::new(store),
            load_status: LoadStatus::Missing,
        };
        agent.load();
        Ok(agent)
    }

    /// Reseed the agent's RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Outcome of the most recent [`load`](Self::load).
    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    /// Score stored for `pos`.
    pub fn value_at(&self, pos: Position) -> Result<f64> {
        self.table.get(pos)
    }

    /// Epsilon-greedy choice for `state` given a uniform sample in [0, 1).
    ///
    /// When `draw < exploration_rate` one of the four actions is picked from
    /// the same sample, `⌊draw / ε · 4⌋`, which is uniform given that the
    /// agent explores. Otherwise the action leading to the best-scoring
    /// on-grid neighbour is returned, ties broken by [`Action::ALL`] order.
    /// With no usable neighbour the result is [`Action::Up`].
    ///
    /// `state` itself is not checked against the grid.
    pub fn select_action(&self, state: Position, draw: f64) -> Action {
        let epsilon = self.config.exploration_rate;
        if draw < epsilon {
            let slot = (draw / epsilon * Action::ALL.len() as f64) as usize;
            return Action::ALL[slot.min(Action::ALL.len() - 1)];
        }

        self.table
            .best_neighbor(state)
            .map_or(Action::Up, |(action, _)| action)
    }

    /// [`select_action`](Self::select_action) with a sample drawn from the agent's RNG.
    pub fn next_action(&mut self, state: Position) -> Action {
        let draw: f64 = self.rng.random();
        self.select_action(state, draw)
    }

    /// One-step update of the cell at `state`:
    ///
    /// `V(s) ← V(s) + α [r + γ max V(s') − V(s)]`
    ///
    /// where `max V(s')` ranges over the on-grid neighbours of `next_state`
    /// and is [`f64::MIN`] when there are none. `action` does not enter the
    /// arithmetic.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PositionOutOfBounds`] if either `state` or
    /// `next_state` is off the grid. The table is left untouched.
    pub fn update(
        &mut self,
        state: Position,
        action: Action,
        reward: f64,
        next_state: Position,
    ) -> Result<()> {
        let current = self.table.get(state)?;
        // next_state must be a valid index even though only its neighbours are read
        self.table.get(next_state)?;

        let max_next = self
            .table
            .best_neighbor(next_state)
            .map_or(f64::MIN, |(_, value)| value);

        let td_target = reward + self.config.discount_factor * max_next;
        let updated = current + self.config.learning_rate * (td_target - current);
        self.table.set(state, updated)?;

        debug!(%state, %action, reward, %next_state, value = updated, "updated value table");
        Ok(())
    }

    /// Encode the table and hand it to the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error on a failed write. The in-memory table is
    /// unaffected either way.
    pub fn save(&self) -> Result<()> {
        let bytes = self.table.to_json()?;
        self.store.write(&bytes)?;
        debug!(bytes = bytes.len(), "saved value table");
        Ok(())
    }

    /// Replace the table with the stored one.
    ///
    /// Falls back to a zero-filled table of the configured size when the
    /// store is empty, cannot be read, or holds anything other than a square
    /// table of that size. Never fails.
    pub fn load(&mut self) -> LoadStatus {
        self.load_status = self.restore();
        self.load_status
    }

    fn restore(&mut self) -> LoadStatus {
        let grid_size = self.config.grid_size;

        let bytes = match self.store.read() {
            Ok(Some(bytes)) if !bytes.is_empty() => bytes,
            Ok(_) => {
                debug!("no stored value table, starting cold");
                self.table = ValueTable::zeros(grid_size);
                return LoadStatus::Missing;
            }
            Err(err) => {
                warn!(error = %err, "could not read value table, starting cold");
                self.table = ValueTable::zeros(grid_size);
                return LoadStatus::Corrupt;
            }
        };

        match ValueTable::from_json(&bytes) {
            Ok(table) if table.grid_size() == grid_size => {
                info!(grid_size, "restored value table");
                self.table = table;
                LoadStatus::Restored
            }
            Ok(table) => {
                warn!(
                    stored = table.grid_size(),
                    expected = grid_size,
                    "stored value table has the wrong size, starting cold"
                );
                self.table = ValueTable::zeros(grid_size);
                LoadStatus::Corrupt
            }
            Err(err) => {
                warn!(error = %err, "stored value table is malformed, starting cold");
                self.table = ValueTable::zeros(grid_size);
                LoadStatus::Corrupt
            }
        }
    }
}

impl std::fmt::Debug for TabularQAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularQAgent")
            .field("config", &self.config)
            .field("grid_size", &self.table.grid_size())
            .field("load_status", &self.load_status)
            .finish_non_exhaustive()
    }
}
