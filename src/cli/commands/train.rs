//! Train command - Play Snake and learn a value table

use std::{
    fs::File,
    path::{Path, PathBuf},
    thread,
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    adapters::JsonFileStore,
    cli::{
        config::SessionConfig,
        output::{format_number, print_kv, print_section, print_subsection},
    },
    game::{RewardConfig, SnakeGame},
    pipeline::{CsvObserver, ProgressObserver, TrainingPipeline, TrainingResult},
    q_learning::{LoadStatus, TabularQAgent},
};

#[derive(Parser, Debug)]
#[command(about = "Train the agent by playing Snake", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Session config file (JSON); flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Grid side length
    #[arg(long, short = 'g')]
    pub grid: Option<usize>,

    /// Learning rate α (0.0-1.0)
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor γ (0.0-1.0)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Exploration rate ε (0.0-1.0)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Number of episodes to play
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Tick limit per episode
    #[arg(long)]
    pub max_ticks: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Value table file, restored before and saved after training
    #[arg(long, short = 't')]
    pub table: Option<PathBuf>,

    /// Independent training sessions to run side by side
    #[arg(long, short = 'n', default_value_t = 1)]
    pub instances: usize,

    /// Optional per-episode history CSV
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Reward shaping (food=10000,collision=-20,closer=1,farther=-3)
    #[arg(long)]
    pub rewards: Option<String>,
}

impl TrainArgs {
    /// Layer the flags over the config file (or the defaults).
    fn session(&self) -> Result<SessionConfig> {
        let mut session = SessionConfig::load_or_default(self.config.as_deref())
            .with_context(|| format!("loading session config {:?}", self.config))?;

        if let Some(grid) = self.grid {
            session.grid_size = grid;
        }
        if let Some(rate) = self.learning_rate {
            session.learning_rate = rate;
        }
        if let Some(discount) = self.discount {
            session.discount_factor = discount;
        }
        if let Some(epsilon) = self.epsilon {
            session.exploration_rate = epsilon;
        }
        if let Some(episodes) = self.episodes {
            session.episodes = episodes;
        }
        if let Some(max_ticks) = self.max_ticks {
            session.max_ticks = max_ticks;
        }
        if self.seed.is_some() {
            session.seed = self.seed;
        }
        if let Some(table) = &self.table {
            session.table = table.clone();
        }
        if let Some(rewards) = &self.rewards {
            session.rewards = parse_rewards(rewards, session.rewards)?;
        }
        Ok(session)
    }
}

/// Parse reward overrides from string (e.g., "food=500,collision=-50").
///
/// Keys not mentioned keep their value from `base`.
pub(crate) fn parse_rewards(s: &str, base: RewardConfig) -> Result<RewardConfig> {
    let mut rewards = base;

    for part in s.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut iter = trimmed.splitn(2, '=');
        let key = iter
            .next()
            .ok_or_else(|| anyhow!("Invalid reward entry: '{trimmed}'"))?;
        let value_str = iter
            .next()
            .ok_or_else(|| anyhow!("Invalid reward entry '{trimmed}'. Expected key=value"))?;
        let value: f64 = value_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid numeric reward '{value_str}' in '{trimmed}'"))?;
        if !value.is_finite() {
            return Err(anyhow!("Reward '{trimmed}' must be finite"));
        }
        match key.trim().to_ascii_lowercase().as_str() {
            "food" => rewards.food = value,
            "collision" => rewards.collision = value,
            "closer" => rewards.closer = value,
            "farther" => rewards.farther = value,
            other => {
                return Err(anyhow!(
                    "Unknown reward key '{other}'. Expected food, collision, closer, or farther"
                ));
            }
        }
    }

    Ok(rewards)
}

/// `runs/table.json` → `runs/table-3.json`
pub(crate) fn instance_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    let name = match base.extension() {
        Some(ext) => format!("{stem}-{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{index}"),
    };
    base.with_file_name(name)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

/// One training session's inputs
struct InstancePlan {
    index: usize,
    table: PathBuf,
    history: Option<PathBuf>,
    seed: Option<u64>,
    progress: bool,
}

#[derive(Debug, Serialize)]
struct InstanceReport {
    index: usize,
    table: PathBuf,
    restored_from: LoadStatus,
    result: TrainingResult,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    session: &'a SessionConfig,
    instances: Vec<InstanceReport>,
}

fn run_instance(session: &SessionConfig, plan: InstancePlan) -> Result<InstanceReport> {
    let mut agent_config = session.agent_config();
    agent_config.seed = plan.seed;

    ensure_parent(&plan.table)?;
    let mut agent = TabularQAgent::new(agent_config, JsonFileStore::new(&plan.table))
        .context("creating agent")?;
    let restored_from = agent.load_status();
    info!(
        instance = plan.index,
        table = %plan.table.display(),
        status = ?restored_from,
        "agent ready"
    );

    let mut game = SnakeGame::new(session.grid_size, plan.seed).context("creating game")?;

    let mut pipeline = TrainingPipeline::new(session.training_config());
    if plan.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(history) = &plan.history {
        ensure_parent(history)?;
        let observer = CsvObserver::new(history)
            .with_context(|| format!("opening history file {}", history.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut agent, &mut game)?;

    agent
        .save()
        .with_context(|| format!("saving value table to {}", plan.table.display()))?;

    Ok(InstanceReport {
        index: plan.index,
        table: plan.table,
        restored_from,
        result,
    })
}

fn print_report(report: &InstanceReport) {
    let result = &report.result;
    print_kv("Table", &report.table.display().to_string());
    print_kv("Restored from", &format!("{:?}", report.restored_from));
    print_kv("Episodes", &format_number(result.episodes));
    print_kv("Ticks", &format_number(result.total_ticks));
    print_kv("Food eaten", &format_number(result.total_food));
    print_kv("Best score", &result.best_score.to_string());
    print_kv("Mean score", &format!("{:.2}", result.mean_score()));
    print_kv("Collisions", &format_number(result.collisions));
    print_kv("Wall resets", &format_number(result.wall_resets));
    print_kv(
        "Reward",
        &format!("{:.2} ± {:.2}", result.mean_reward, result.reward_std_dev),
    );
    if result.save_failures > 0 {
        print_kv("Failed saves", &result.save_failures.to_string());
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    if args.instances == 0 {
        return Err(anyhow!("--instances must be at least 1"));
    }

    let session = args.session()?;
    session
        .agent_config()
        .validate()
        .context("invalid agent settings")?;

    print_section("Training");
    print_kv("Grid", &format!("{0}x{0}", session.grid_size));
    print_kv(
        "α / γ / ε",
        &format!(
            "{} / {} / {}",
            session.learning_rate, session.discount_factor, session.exploration_rate
        ),
    );
    print_kv("Episodes", &format_number(session.episodes));
    print_kv("Max ticks", &format_number(session.max_ticks));
    print_kv("Instances", &args.instances.to_string());

    let plans: Vec<InstancePlan> = if args.instances == 1 {
        vec![InstancePlan {
            index: 0,
            table: session.table.clone(),
            history: args.history.clone(),
            seed: session.seed,
            progress: !args.no_progress,
        }]
    } else {
        (0..args.instances)
            .map(|i| InstancePlan {
                index: i,
                table: instance_path(&session.table, i),
                history: args.history.as_deref().map(|h| instance_path(h, i)),
                seed: session.seed.map(|s| s.wrapping_add(i as u64)),
                // Several bars on one terminal garble each other.
                progress: false,
            })
            .collect()
    };

    let reports = if plans.len() == 1 {
        plans
            .into_iter()
            .map(|plan| run_instance(&session, plan))
            .collect::<Result<Vec<_>>>()?
    } else {
        let session = &session;
        thread::scope(|scope| {
            let handles: Vec<_> = plans
                .into_iter()
                .map(|plan| {
                    let index = plan.index;
                    (index, scope.spawn(move || run_instance(session, plan)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(index, handle)| {
                    handle
                        .join()
                        .map_err(|_| anyhow!("training instance {index} panicked"))?
                        .with_context(|| format!("training instance {index}"))
                })
                .collect::<Result<Vec<_>>>()
        })?
    };

    for report in &reports {
        if reports.len() > 1 {
            print_subsection(&format!("Instance {}", report.index));
        } else {
            print_subsection("Results");
        }
        print_report(report);
    }

    if let Some(summary_path) = &args.summary {
        ensure_parent(summary_path)?;
        let summary = TrainingSummaryFile {
            session: &session,
            instances: reports,
        };
        let file = File::create(summary_path)
            .with_context(|| format!("creating summary file {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
