//! Inspect command - Summarize a stored value table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::{
    cli::output::{print_kv, print_section, print_subsection, render_heatmap},
    q_learning::ValueTable,
    types::Position,
};

#[derive(Parser, Debug)]
#[command(about = "Show statistics and a heat map for a value table")]
pub struct InspectArgs {
    /// Value table file
    #[arg(default_value = "qTable.json")]
    pub table: PathBuf,

    /// Number of highest-valued cells to list
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Skip the heat map
    #[arg(long, default_value_t = false)]
    pub no_heatmap: bool,

    /// Print the statistics as JSON instead of a report
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Summary statistics over every cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStats {
    pub grid_size: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Cells holding a non-zero score
    pub visited: usize,
    /// Highest-valued cells, best first
    pub top: Vec<(Position, f64)>,
}

impl TableStats {
    pub fn from_table(table: &ValueTable, top: usize) -> Self {
        let values = table.values();
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let std_dev = if values.len() < 2 {
            0.0
        } else {
            values.std_dev()
        };

        let grid_size = table.grid_size();
        let mut cells: Vec<(Position, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let pos = Position::new((i / grid_size) as i32, (i % grid_size) as i32);
                (pos, v)
            })
            .collect();
        cells.sort_by(|a, b| b.1.total_cmp(&a.1));
        cells.truncate(top);

        Self {
            grid_size,
            min,
            max,
            mean: values.mean(),
            std_dev,
            visited: values.iter().filter(|v| **v != 0.0).count(),
            top: cells,
        }
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let bytes = std::fs::read(&args.table)
        .with_context(|| format!("reading value table {}", args.table.display()))?;
    let table = ValueTable::from_json(&bytes)
        .with_context(|| format!("parsing value table {}", args.table.display()))?;
    let stats = TableStats::from_table(&table, args.top);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_section(&format!("Value table {}", args.table.display()));
    print_kv("Grid", &format!("{0}x{0}", stats.grid_size));
    print_kv("Min", &format!("{:.4}", stats.min));
    print_kv("Max", &format!("{:.4}", stats.max));
    print_kv("Mean", &format!("{:.4}", stats.mean));
    print_kv("Std dev", &format!("{:.4}", stats.std_dev));
    print_kv(
        "Visited cells",
        &format!("{} / {}", stats.visited, stats.grid_size * stats.grid_size),
    );

    if !stats.top.is_empty() {
        print_subsection("Top cells");
        for (pos, value) in &stats.top {
            print_kv(&pos.to_string(), &format!("{value:.4}"));
        }
    }

    if !args.no_heatmap {
        print_subsection("Heat map (x →, y ↓)");
        print!("{}", render_heatmap(&table));
    }

    Ok(())
}
