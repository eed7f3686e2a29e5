//! Output formatting for CLI reports

use crate::q_learning::ValueTable;

/// Characters from coldest to hottest
const HEAT_RAMP: &[u8] = b" .:-=+*#%@";

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Render the table as text, one line per `y`, `x` running left to right.
///
/// Values are scaled linearly between the table's minimum and maximum; a
/// flat table renders as the coldest character.
pub fn render_heatmap(table: &ValueTable) -> String {
    let grid_size = table.grid_size();
    let (min, max) = table
        .values()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;
    let top = HEAT_RAMP.len() - 1;

    let rows: Vec<&[f64]> = table.rows().collect();
    let mut out = String::with_capacity(grid_size * (grid_size + 1));
    for y in 0..grid_size {
        for row in &rows {
            let level = if span > 0.0 && span.is_finite() {
                (((row[y] - min) / span) * top as f64).round() as usize
            } else {
                0
            };
            out.push(HEAT_RAMP[level.min(top)] as char);
        }
        out.push('\n');
    }
    out
}
