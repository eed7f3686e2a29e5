//! Play command - Greedy playback of a trained table

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    adapters::JsonFileStore,
    cli::output::{format_number, print_kv, print_section, print_subsection},
    game::SnakeGame,
    pipeline::{MetricsObserver, SharedObserver, TrainingConfig, TrainingPipeline},
    q_learning::{AgentConfig, LoadStatus, TabularQAgent, ValueTable},
};

#[derive(Parser, Debug)]
#[command(about = "Play greedily with a trained table (no learning, no saves)")]
pub struct PlayArgs {
    /// Value table file
    #[arg(default_value = "qTable.json")]
    pub table: PathBuf,

    /// Number of games to play
    #[arg(long, short = 'e', default_value_t = 10)]
    pub episodes: usize,

    /// Tick limit per game
    #[arg(long, default_value_t = 2_000)]
    pub max_ticks: usize,

    /// Grid side length; defaults to the stored table's size
    #[arg(long, short = 'g')]
    pub grid: Option<usize>,

    /// Random seed for food placement
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Read the grid size from the table file so playback needs no extra flags.
fn stored_grid_size(path: &Path) -> Result<usize> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading value table {}", path.display()))?;
    let table = ValueTable::from_json(&bytes)
        .with_context(|| format!("parsing value table {}", path.display()))?;
    Ok(table.grid_size())
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let grid_size = match args.grid {
        Some(grid) => grid,
        None => stored_grid_size(&args.table)?,
    };

    let mut config = AgentConfig::new(grid_size).with_exploration_rate(0.0);
    config.seed = args.seed;
    let mut agent = TabularQAgent::new(config, JsonFileStore::new(&args.table))
        .context("creating agent")?;
    if agent.load_status() != LoadStatus::Restored {
        return Err(anyhow!(
            "no usable {grid_size}x{grid_size} table in {} ({:?})",
            args.table.display(),
            agent.load_status()
        ));
    }

    let mut game = SnakeGame::new(grid_size, args.seed).context("creating game")?;

    let metrics = SharedObserver::new(MetricsObserver::new());
    let handle = metrics.clone_ref();
    let result = TrainingPipeline::new(TrainingConfig::evaluation(args.episodes, args.max_ticks))
        .with_observer(Box::new(metrics))
        .run(&mut agent, &mut game)?;

    let summary = handle
        .lock()
        .map_err(|_| anyhow!("metrics lock poisoned"))?
        .summary();

    print_section("Playback");
    print_kv("Table", &args.table.display().to_string());
    print_kv("Grid", &format!("{grid_size}x{grid_size}"));

    print_subsection("Results");
    print_kv("Games", &format_number(result.episodes));
    print_kv("Food eaten", &format_number(result.total_food));
    print_kv("Best score", &result.best_score.to_string());
    print_kv("Mean score", &format!("{:.2}", result.mean_score()));
    print_kv(
        "Collision rate",
        &format!("{:.1}%", summary.collision_rate * 100.0),
    );
    print_kv(
        "Avg game length",
        &format!("{:.1} ticks", summary.avg_episode_length),
    );
    print_kv("Wall resets", &format_number(summary.wall_resets));

    Ok(())
}
