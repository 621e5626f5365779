//! Pipe orientation model.
//!
//! Every pipe port points at one of the four compass directions. A quarter
//! turn clockwise maps each direction to its successor in the cycle
//! N -> E -> S -> W -> N, so four turns always bring a pipe back to where it
//! started.
//!
//! Board coordinates grow to the right (`x`) and downwards (`y`).

use strum::{Display, EnumString, VariantArray};

use crate::pipes::Coord;

/// A compass direction a pipe port can point at.
///
/// Written as a single letter (`N`, `E`, `S`, `W`) in puzzle and report files.
///
/// Discriminants index into [`CLOCKWISE`] and [`OFFSETS`]; keep them in
/// clockwise order.
#[derive(
    Clone, Copy, Debug, Display, EnumString, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray,
)]
pub enum Direction {
    #[strum(to_string = "N")]
    North = 0,
    #[strum(to_string = "E")]
    East = 1,
    #[strum(to_string = "S")]
    South = 2,
    #[strum(to_string = "W")]
    West = 3,
}

/// Clockwise successor of every direction.
pub const CLOCKWISE: [Direction; 4] = [
    Direction::East,  // after North
    Direction::South, // after East
    Direction::West,  // after South
    Direction::North, // after West
];

/// Unit step taken when leaving a cell through a port.
pub const OFFSETS: [Coord; 4] = [
    (0, -1), // North
    (1, 0),  // East
    (0, 1),  // South
    (-1, 0), // West
];

impl Direction {
    /// The direction a port points at after one quarter turn clockwise.
    #[inline]
    pub const fn rotated(self) -> Self {
        CLOCKWISE[self as usize]
    }

    /// The `(dx, dy)` step towards the neighbouring cell.
    #[inline]
    pub const fn offset(self) -> Coord {
        OFFSETS[self as usize]
    }

    /// The neighbouring coordinate reached by leaving `from` through this port.
    ///
    /// `None` when the step leaves the `i32` coordinate range; such a cell is
    /// off every board.
    #[inline]
    pub fn step_from(self, from: Coord) -> Option<Coord> {
        let (dx, dy) = self.offset();
        Some((from.0.checked_add(dx)?, from.1.checked_add(dy)?))
    }
}
