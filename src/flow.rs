//! Colour-aware flow reachability search.
//!
//! Flow enters the board one cell below a source and spreads through placed
//! pipes: at every cell it leaves through the ports of each pipe sitting
//! there, in pool order and then port order. The search is depth-first and
//! the first branch that reaches the target wins.
//!
//! Uses an explicit stack rather than recursion so large boards cannot
//! overflow the call stack, and a per-search visited set so every cell is
//! expanded at most once. Popping cells in last-in-first-out order with
//! children pushed in reverse gives exactly the visiting order of the
//! recursive formulation.

use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::geometry::Direction;
use crate::grid::Grid;
use crate::pipes::{Coord, Pipe, Source};

/// Where flow enters the board for `source`: the cell directly below it.
///
/// `None` when a source on the bottom edge of the coordinate range has no
/// cell below it.
#[inline]
pub fn entry_cell(source: &Source) -> Option<Coord> {
    Direction::South.step_from(source.position)
}

/// Collects the exit ports of every placed pipe, keyed by cell.
///
/// Pipes sharing a cell contribute their ports in pool order.
fn exits_by_cell(pipes: &[Pipe]) -> FxHashMap<Coord, Vec<Direction>> {
    let mut exits: FxHashMap<Coord, Vec<Direction>> = FxHashMap::default();
    for pipe in pipes {
        if let Some(position) = pipe.position {
            exits.entry(position).or_default().extend(pipe.ports);
        }
    }
    exits
}

/// Searches for a pipe path from below `source` to `target` in `color`.
///
/// See [`flood_from`].
pub fn flood(grid: &mut Grid, source: &Source, color: &str, pipes: &[Pipe], target: Coord) -> bool {
    match entry_cell(source) {
        Some(start) => flood_from(grid, start, color, pipes, target),
        None => false,
    }
}

/// Searches for a pipe path from `start` to `target`, flooding the cells it
/// passes through with `color`.
///
/// A branch stops at any cell that is off the board or already carries a
/// different colour. Reaching `target` ends the search successfully; the
/// target cell itself is not flooded by the search. Returns `false` once
/// every reachable cell has been expanded without meeting the target.
pub fn flood_from(
    grid: &mut Grid,
    start: Coord,
    color: &str,
    pipes: &[Pipe],
    target: Coord,
) -> bool {
    let exits = exits_by_cell(pipes);
    let mut visited: FxHashSet<Coord> = FxHashSet::default();
    let mut search_stack = vec![start];

    while let Some(cell) = search_stack.pop() {
        // off the board, or another colour already flows here
        if !grid.can_flow(cell.0, cell.1, color) {
            continue;
        }
        if cell == target {
            trace!("{color} reached ({}, {}) after {} cells", cell.0, cell.1, visited.len());
            return true;
        }
        if !visited.insert(cell) {
            continue;
        }

        grid.set_flow(cell.0, cell.1, color);

        if let Some(ports) = exits.get(&cell) {
            // reversed so the first port is popped, and explored, first.
            // A step out of coordinate range is a leak, like any off-board cell.
            search_stack.extend(ports.iter().rev().filter_map(|port| port.step_from(cell)));
        }
    }

    trace!("{color} exhausted {} cells without reaching target", visited.len());
    false
}
