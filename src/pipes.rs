//! Puzzle entities: pipes, sources and consumers.
//!
//! All entities are created once when a puzzle is loaded. Solving only ever
//! moves and turns pipes and flips [`Consumer::flooded`].

use crate::geometry::Direction;

/// A board coordinate `(x, y)`.
///
/// Signed so that template offsets may point off the board; only the grid
/// decides whether a coordinate is usable.
pub type Coord = (i32, i32);

/// A flow colour label. Colours match by exact string equality.
pub type Color = String;

/// Quarter turns in a full revolution.
pub const FULL_TURN: usize = 4;

/// A two-port pipe segment from the shared pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipe {
    pub id: String,
    /// Port order matters: the flow search follows ports in this order.
    pub ports: [Direction; 2],
    /// `None` until the pipe has been placed on the board.
    pub position: Option<Coord>,
}

impl Pipe {
    pub fn new(id: impl Into<String>, ports: [Direction; 2]) -> Self {
        Self {
            id: id.into(),
            ports,
            position: None,
        }
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Turns the pipe a quarter turn clockwise, moving both ports together.
    pub fn rotate(&mut self) {
        for port in &mut self.ports {
            *port = port.rotated();
        }
    }

    /// Returns true if the ports are exactly `{from, to}`, in either order.
    pub fn fits(&self, from: Direction, to: Direction) -> bool {
        let [a, b] = self.ports;
        (a == from && b == to) || (a == to && b == from)
    }

    /// Turns the pipe clockwise until it fits `required`, using as few turns
    /// as possible.
    ///
    /// Returns the number of turns taken. If no orientation fits, the pipe
    /// ends up back in its original orientation and `None` is returned.
    pub fn orient_to(&mut self, required: (Direction, Direction)) -> Option<usize> {
        for turns in 0..FULL_TURN {
            if self.fits(required.0, required.1) {
                return Some(turns);
            }
            self.rotate();
        }
        None
    }
}

/// A coloured flow source with a fixed position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub id: String,
    pub color: Color,
    pub position: Coord,
    /// Declared output ports. Informational; the flow search ignores them.
    pub outputs: Vec<Direction>,
}

/// A coloured consumer waiting to be flooded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consumer {
    pub id: String,
    pub color: Color,
    pub position: Coord,
    /// Declared input ports. Informational; the flow search ignores them.
    pub inputs: Vec<Direction>,
    /// Result of the most recent connection attempt for this consumer.
    pub flooded: bool,
}

impl Source {
    pub fn new(id: impl Into<String>, color: impl Into<Color>, position: Coord) -> Self {
        Self {
            id: id.into(),
            color: color.into(),
            position,
            outputs: Vec::new(),
        }
    }
}

impl Consumer {
    pub fn new(id: impl Into<String>, color: impl Into<Color>, position: Coord) -> Self {
        Self {
            id: id.into(),
            color: color.into(),
            position,
            inputs: Vec::new(),
            flooded: false,
        }
    }
}
