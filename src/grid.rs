//! Board state for the flow simulation.
//!
//! The grid is a flat, row-major vector of cells. Each cell remembers which
//! colour (if any) has flowed through it and whether it has been flooded.
//! The grid lives for a whole solving run: flood marks from earlier phases
//! are never cleared.

use std::fmt;

use crate::pipes::Color;

/// One board cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// `None` while no colour has reached the cell.
    pub color: Option<Color>,
    pub flooded: bool,
}

impl Cell {
    /// Returns true if `color` may flow through this cell without mixing.
    #[inline]
    pub fn admits(&self, color: &str) -> bool {
        self.color.as_deref().map_or(true, |own| own == color)
    }
}

/// A `rows x cols` board of [`Cell`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`. The puzzle parser rejects
    /// such boards.
    pub fn new(rows: usize, cols: usize) -> Self {
        let Some(len) = rows.checked_mul(cols) else {
            panic!("{rows}x{cols} board overflows the cell count");
        };
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Converts `(x, y)` to a cell index, or `None` when off the board.
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.cols && y < self.rows).then(|| y * self.cols + x)
    }

    /// Returns true if `(x, y)` lies in `[0, cols) x [0, rows)`.
    #[inline]
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// The colour admission check: `(x, y)` is on the board and either
    /// empty or already carrying `color`.
    ///
    /// This is the only place colour mixing is prevented.
    pub fn can_flow(&self, x: i32, y: i32, color: &str) -> bool {
        self.cell(x, y).is_some_and(|cell| cell.admits(color))
    }

    /// Tags `(x, y)` with `color` and marks it flooded.
    ///
    /// Does not check for a colour conflict; callers gate writes with
    /// [`can_flow`](Self::can_flow). Off-board writes are ignored.
    pub fn set_flow(&mut self, x: i32, y: i32, color: &str) {
        if let Some(i) = self.index(x, y) {
            let cell = &mut self.cells[i];
            if cell.color.as_deref() != Some(color) {
                cell.color = Some(color.to_owned());
            }
            cell.flooded = true;
        }
    }

    pub fn is_flooded(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(|cell| cell.flooded)
    }

    /// Number of cells flooded so far, across all phases.
    pub fn flooded_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.flooded).count()
    }
}

/// Renders one character per cell: `.` for untouched cells, otherwise the
/// upper-cased first character of the cell colour.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            for cell in row {
                let symbol = cell
                    .color
                    .as_deref()
                    .and_then(|color| color.chars().next())
                    .map_or('.', |c| c.to_ascii_uppercase());
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
