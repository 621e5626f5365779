//! Pipe flow puzzle engine.
//!
//! Coloured sources have to be connected to consumers of the same colour
//! through rotatable two-port pipes, without mixing colours or leaking off
//! the board. The puzzle is played in phases; each phase activates the
//! sources of one colour, lays out unused pipes in a fixed template below
//! each active source and then follows the flow to see which consumers get
//! flooded.
//!
//! Load a [`Puzzle`] from text, call [`Puzzle::solve`], and render the
//! outcome with [`report::format_report`].

pub mod flow;
pub mod geometry;
pub mod grid;
pub mod pipes;
pub mod puzzle;
pub mod report;
pub mod solver;
pub mod template;

pub use geometry::Direction;
pub use grid::{Cell, Grid};
pub use pipes::{Color, Consumer, Coord, Pipe, Source};
pub use puzzle::{LoadError, ParseError, Puzzle};
pub use solver::{Diagnostic, FailureKind, PhaseResult, PlacementIssue, Solution};
pub use template::{TemplateSlot, PLACEMENT_TEMPLATE};
