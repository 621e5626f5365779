//! Phase driver.
//!
//! Phases run strictly in declared order. In each phase every source of the
//! phase colour is paired with every consumer of that colour; each pairing
//! lays out the placement template around the source and then searches for a
//! flow path to the consumer. A consumer counts as flooded when its own cell
//! ends up flooded.
//!
//! Failures are never fatal. A failed pairing produces one [`Diagnostic`]
//! and the run moves on; placement problems are collected separately as
//! [`PlacementIssue`]s. Board state carries over from one phase to the next.

use std::fmt;

use log::{debug, info, warn};

use crate::flow::flood;
use crate::grid::Grid;
use crate::pipes::{Color, Consumer, Coord, Pipe, Source};
use crate::puzzle::Puzzle;
use crate::template::{place_pipes, SlotOutcome, TemplateSlot, PLACEMENT_TEMPLATE};

/// How a source/consumer pairing failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The flow search ran out of cells without meeting the consumer.
    Leak,
    /// The search met the consumer position but the consumer cell was
    /// never flooded.
    Disconnected,
}

/// One failed connection attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub phase: Color,
    pub source: String,
    pub consumer: String,
    pub at: Coord,
    pub kind: FailureKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.at;
        match self.kind {
            FailureKind::Leak => write!(
                f,
                "phase {}: leak or disconnected board, consumer {} at ({x}, {y}) unreachable from source {}",
                self.phase, self.consumer, self.source
            ),
            FailureKind::Disconnected => write!(
                f,
                "phase {}: consumer {} at ({x}, {y}) not flooded by source {}",
                self.phase, self.consumer, self.source
            ),
        }
    }
}

/// Why a template slot was left empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueKind {
    OffBoard,
    Shortage,
    /// Carries the id of the pipe that could not be turned to fit.
    Misfit(String),
}

/// A template slot that could not be filled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementIssue {
    pub phase: Color,
    pub source: String,
    /// Slot position; `None` when it lies beyond the coordinate range.
    pub at: Option<Coord>,
    pub kind: IssueKind,
}

impl PlacementIssue {
    fn from_outcome(outcome: SlotOutcome, phase: &str, source: &Source, pipes: &[Pipe]) -> Option<Self> {
        let (at, kind) = match outcome {
            SlotOutcome::Placed { .. } => return None,
            SlotOutcome::OffBoard { at } => (at, IssueKind::OffBoard),
            SlotOutcome::Shortage { at } => (Some(at), IssueKind::Shortage),
            SlotOutcome::Misfit { pipe, at } => (Some(at), IssueKind::Misfit(pipes[pipe].id.clone())),
        };
        Some(Self {
            phase: phase.to_owned(),
            source: source.id.clone(),
            at,
            kind,
        })
    }
}

impl fmt::Display for PlacementIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {}: source {} slot ", self.phase, self.source)?;
        match self.at {
            Some((x, y)) => write!(f, "({x}, {y}) ")?,
            None => write!(f, "beyond the coordinate range ")?,
        }
        match &self.kind {
            IssueKind::OffBoard => write!(f, "is off the board"),
            IssueKind::Shortage => write!(f, "left empty, no unplaced pipes remain"),
            IssueKind::Misfit(pipe) => write!(f, "left empty, pipe {pipe} cannot be turned to fit"),
        }
    }
}

/// Outcome of one phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseResult {
    pub label: Color,
    /// Ids of the sources active in this phase.
    pub taps: Vec<String>,
    /// Ids of every consumer flagged as flooded when the phase finished.
    pub flooded_consumers: Vec<String>,
}

/// Everything a solving run produced besides the mutated puzzle.
#[derive(Clone, Debug)]
pub struct Solution {
    pub phases: Vec<PhaseResult>,
    pub diagnostics: Vec<Diagnostic>,
    pub placement_issues: Vec<PlacementIssue>,
    /// Final board state, accumulated over all phases.
    pub grid: Grid,
}

impl Solution {
    /// True if no connection attempt failed.
    pub fn all_connected(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs every phase with the standard [`PLACEMENT_TEMPLATE`].
pub fn solve(puzzle: &mut Puzzle) -> Solution {
    solve_with_template(puzzle, &PLACEMENT_TEMPLATE)
}

/// Runs every phase of `puzzle`, placing pipes with `template`.
///
/// Mutates pipe positions and ports and each paired consumer's `flooded`
/// flag in place.
pub fn solve_with_template(puzzle: &mut Puzzle, template: &[TemplateSlot]) -> Solution {
    let Puzzle {
        rows,
        cols,
        sources,
        consumers,
        pipes,
        phases,
    } = puzzle;

    let mut solution = Solution {
        phases: Vec::with_capacity(phases.len()),
        diagnostics: Vec::new(),
        placement_issues: Vec::new(),
        grid: Grid::new(*rows, *cols),
    };

    for phase in phases.iter() {
        info!("phase {phase}");
        let mut taps = Vec::new();

        for source in sources.iter().filter(|source| source.color == *phase) {
            taps.push(source.id.clone());
            for consumer in consumers.iter_mut().filter(|consumer| consumer.color == *phase) {
                connect(&mut solution, phase, source, consumer, pipes, template);
            }
        }

        let flooded_consumers = consumers
            .iter()
            .filter(|consumer| consumer.flooded)
            .map(|consumer| consumer.id.clone())
            .collect();
        solution.phases.push(PhaseResult {
            label: phase.clone(),
            taps,
            flooded_consumers,
        });
    }

    solution
}

/// One pairing: place the template, search, record the consumer state.
fn connect(
    solution: &mut Solution,
    phase: &str,
    source: &Source,
    consumer: &mut Consumer,
    pipes: &mut [Pipe],
    template: &[TemplateSlot],
) {
    info!(
        "connecting source {} at {:?} to consumer {} at {:?}",
        source.id, source.position, consumer.id, consumer.position
    );

    let outcomes = place_pipes(&mut solution.grid, source, phase, pipes, template);
    let placed = outcomes.iter().filter(|outcome| outcome.is_placed()).count();
    debug!("source {} filled {placed} of {} template slots", source.id, outcomes.len());
    for outcome in outcomes {
        if let Some(issue) = PlacementIssue::from_outcome(outcome, phase, source, pipes) {
            warn!("{issue}");
            solution.placement_issues.push(issue);
        }
    }

    let reached = flood(&mut solution.grid, source, phase, pipes, consumer.position);
    let (x, y) = consumer.position;
    consumer.flooded = solution.grid.is_flooded(x, y);

    let kind = if !reached {
        FailureKind::Leak
    } else if !consumer.flooded {
        FailureKind::Disconnected
    } else {
        info!("consumer {} flooded", consumer.id);
        return;
    };

    let diagnostic = Diagnostic {
        phase: phase.to_owned(),
        source: source.id.clone(),
        consumer: consumer.id.clone(),
        at: consumer.position,
        kind,
    };
    warn!("{diagnostic}");
    solution.diagnostics.push(diagnostic);
}
