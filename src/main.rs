//! Pipe Flow Puzzle Solver
//!
//! Reads a puzzle description, runs every phase in order and writes the pipe
//! placement and per-phase flood results to a report file. Failed
//! connections are logged as warnings and do not stop the run.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, LevelFilter};

use pipeflood::{report, Puzzle};

/// Puzzle file read when no input is given.
const PUZZLE_FILE: &str = "pipes.txt";

/// Places pipes for each phase of a pipe flow puzzle and reports which
/// consumers get flooded.
#[derive(Parser)]
#[command(name = "pipeflood")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Puzzle description to solve.
    #[arg(default_value = PUZZLE_FILE)]
    input: PathBuf,
    /// Report file to write.
    #[arg(short, long, default_value = report::REPORT_FILE)]
    output: PathBuf,
    /// Print the final board after solving.
    #[arg(long)]
    board: bool,
    /// Log more detail (-v for progress, -vv for every placement).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Maps the `-v` count to a log level; `RUST_LOG` can still override it.
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    let mut puzzle = match Puzzle::load(&cli.input) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            error!("{}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let solution = puzzle.solve();

    if cli.board {
        println!("Board {}x{}:", solution.grid.rows(), solution.grid.cols());
        print!("{}", solution.grid);
    }

    let flooded = puzzle.consumers.iter().filter(|c| c.flooded).count();
    if solution.all_connected() {
        println!(
            "Solved {} phases: {flooded} of {} consumers flooded, no failed connections",
            solution.phases.len(),
            puzzle.consumers.len()
        );
    } else {
        println!(
            "Solved {} phases: {flooded} of {} consumers flooded, {} failed connections",
            solution.phases.len(),
            puzzle.consumers.len(),
            solution.diagnostics.len()
        );
    }

    if let Err(e) = report::save(&cli.output, &puzzle, &solution) {
        error!("failed to write {}: {e}", cli.output.display());
        return ExitCode::FAILURE;
    }
    println!("Wrote {}", cli.output.display());

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pipeflood"]).unwrap();
        assert_eq!(cli.input, PathBuf::from(PUZZLE_FILE));
        assert_eq!(cli.output, PathBuf::from(report::REPORT_FILE));
        assert!(!cli.board);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["pipeflood", "level.txt", "-o", "out.txt", "--board", "-vv"])
            .unwrap();
        assert_eq!(cli.input, PathBuf::from("level.txt"));
        assert_eq!(cli.output, PathBuf::from("out.txt"));
        assert!(cli.board);
        assert_eq!(log_level(cli.verbose), LevelFilter::Debug);
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(1), LevelFilter::Info);
        assert_eq!(log_level(5), LevelFilter::Debug);
    }
}
