//! Result report written after a solving run.
//!
//! Text format:
//! - `[Placement]` header, then one line per placed pipe in pool order:
//!   `<id> <x> <y> <port> <port>`
//! - a blank line and a `[Phases]` header
//! - per phase, numbered from 1:
//!   - `Phase <n>: <colour>`
//!   - `Taps: <active source ids>`
//!   - `Flooded consumers: <consumer ids>`
//!   - a blank line

use std::fs;
use std::path::Path;

use crate::puzzle::Puzzle;
use crate::solver::Solution;

/// Default report file name used by the command-line tool.
pub const REPORT_FILE: &str = "output.txt";

/// Renders the report for a solved puzzle.
pub fn format_report(puzzle: &Puzzle, solution: &Solution) -> String {
    let mut output = String::from("[Placement]\n");
    for (pipe, (x, y)) in puzzle.placed_pipes() {
        let [first, second] = pipe.ports;
        output.push_str(&format!("{} {x} {y} {first} {second}\n", pipe.id));
    }

    output.push_str("\n[Phases]\n");
    for (i, phase) in solution.phases.iter().enumerate() {
        output.push_str(&format!("Phase {}: {}\n", i + 1, phase.label));
        push_id_line(&mut output, "Taps:", &phase.taps);
        push_id_line(&mut output, "Flooded consumers:", &phase.flooded_consumers);
        output.push('\n');
    }

    output
}

/// Appends `label` followed by each id, space separated.
fn push_id_line(output: &mut String, label: &str, ids: &[String]) {
    output.push_str(label);
    for id in ids {
        output.push(' ');
        output.push_str(id);
    }
    output.push('\n');
}

/// Writes the report to `path`, replacing any existing file.
pub fn save(path: impl AsRef<Path>, puzzle: &Puzzle, solution: &Solution) -> std::io::Result<()> {
    fs::write(path, format_report(puzzle, solution))
}
