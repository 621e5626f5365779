//! Fixed-shape pipe placement around an active source.
//!
//! The template is plain data: an ordered list of slots, each an offset from
//! the source and the port pair the pipe in that slot must expose. Slots are
//! filled in order from the pipe pool: the first unplaced pipe goes to the
//! first slot, the next one to the second slot, and so on. A pipe that does
//! not fit its slot is not offered to a later slot of the same source. There
//! is no search over alternative pipes, positions or templates.

use log::{debug, warn};

use crate::geometry::Direction;
use crate::grid::Grid;
use crate::pipes::{Coord, Pipe, Source};

/// One position of the placement template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateSlot {
    /// Offset from the source position.
    pub offset: Coord,
    /// Ports the placed pipe must expose, in either order.
    pub ports: (Direction, Direction),
}

impl TemplateSlot {
    /// Absolute board position of this slot for a source at `origin`, or
    /// `None` when it falls outside the `i32` coordinate range.
    #[inline]
    pub fn position_from(&self, origin: Coord) -> Option<Coord> {
        Some((
            origin.0.checked_add(self.offset.0)?,
            origin.1.checked_add(self.offset.1)?,
        ))
    }
}

/// The three-pipe template laid out in the row below a source.
pub const PLACEMENT_TEMPLATE: [TemplateSlot; 3] = [
    TemplateSlot {
        offset: (0, 1),
        ports: (Direction::East, Direction::South),
    },
    TemplateSlot {
        offset: (1, 1),
        ports: (Direction::North, Direction::East),
    },
    TemplateSlot {
        offset: (2, 1),
        ports: (Direction::West, Direction::South),
    },
];

/// What happened to a single template slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotOutcome {
    /// Pool pipe `pipe` now sits at `at` after `turns` quarter turns.
    Placed { pipe: usize, at: Coord, turns: usize },
    /// The slot lies outside the board; no pipe was consumed. `at` is `None`
    /// when the slot is not even addressable.
    OffBoard { at: Option<Coord> },
    /// No pipe is left that is unplaced and untried for this source.
    Shortage { at: Coord },
    /// The pipe `pipe` drawn for this slot cannot expose the required ports
    /// in any orientation. It stays unplaced.
    Misfit { pipe: usize, at: Coord },
}

impl SlotOutcome {
    #[inline]
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// Fills the `template` slots around `source` from the pipe pool.
///
/// Each placed pipe is turned the fewest quarter turns needed to match its
/// slot, and the slot cell is flooded with `color`. The write is not
/// colour-checked: the template is trusted for the puzzle at hand, a
/// conflicting cell is only reported in the log. Pipes that are already on
/// the board are never moved.
///
/// Returns one outcome per slot, in template order.
pub fn place_pipes(
    grid: &mut Grid,
    source: &Source,
    color: &str,
    pipes: &mut [Pipe],
    template: &[TemplateSlot],
) -> Vec<SlotOutcome> {
    // pool index of the first pipe not yet drawn for this source
    let mut next = 0;
    template
        .iter()
        .map(|slot| fill_slot(grid, source, color, pipes, slot, &mut next))
        .collect()
}

fn fill_slot(
    grid: &mut Grid,
    source: &Source,
    color: &str,
    pipes: &mut [Pipe],
    slot: &TemplateSlot,
    next: &mut usize,
) -> SlotOutcome {
    let at = match slot.position_from(source.position) {
        Some(at) if grid.is_valid(at.0, at.1) => at,
        at => return SlotOutcome::OffBoard { at },
    };

    let Some(index) = (*next..pipes.len()).find(|&i| !pipes[i].is_placed()) else {
        return SlotOutcome::Shortage { at };
    };
    *next = index + 1;

    let pipe = &mut pipes[index];
    let Some(turns) = pipe.orient_to(slot.ports) else {
        return SlotOutcome::Misfit { pipe: index, at };
    };
    pipe.position = Some(at);

    if !grid.can_flow(at.0, at.1, color) {
        warn!(
            "pipe {} at ({}, {}) overwrites a cell of another colour with {color}",
            pipe.id, at.0, at.1
        );
    }
    grid.set_flow(at.0, at.1, color);

    debug!(
        "placed pipe {} at ({}, {}) with ports {} {} after {turns} turn(s)",
        pipe.id, at.0, at.1, pipe.ports[0], pipe.ports[1]
    );
    SlotOutcome::Placed {
        pipe: index,
        at,
        turns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{East, North, South, West};

    fn source_at(position: Coord) -> Source {
        Source::new("S1", "R", position)
    }

    #[test]
    fn test_template_geometry() {
        let positions: Vec<Option<Coord>> = PLACEMENT_TEMPLATE
            .iter()
            .map(|slot| slot.position_from((4, 2)))
            .collect();
        assert_eq!(positions, vec![Some((4, 3)), Some((5, 3)), Some((6, 3))]);
        assert_eq!(PLACEMENT_TEMPLATE[0].ports, (East, South));
        assert_eq!(PLACEMENT_TEMPLATE[1].ports, (North, East));
        assert_eq!(PLACEMENT_TEMPLATE[2].ports, (West, South));
    }

    #[test]
    fn test_slot_past_coordinate_range_has_no_position() {
        assert_eq!(PLACEMENT_TEMPLATE[0].position_from((0, i32::MAX)), None);
        assert_eq!(PLACEMENT_TEMPLATE[1].position_from((i32::MAX, 0)), None);
        assert_eq!(PLACEMENT_TEMPLATE[0].position_from((i32::MAX, 0)), Some((i32::MAX, 1)));
    }

    #[test]
    fn test_places_three_pipes_in_pool_order() {
        let mut grid = Grid::new(3, 3);
        let mut pipes = vec![
            Pipe::new("P1", [North, East]),
            Pipe::new("P2", [West, North]),
            Pipe::new("P3", [North, East]),
        ];

        let outcomes = place_pipes(&mut grid, &source_at((0, 0)), "R", &mut pipes, &PLACEMENT_TEMPLATE);

        assert_eq!(
            outcomes,
            vec![
                SlotOutcome::Placed { pipe: 0, at: (0, 1), turns: 1 },
                SlotOutcome::Placed { pipe: 1, at: (1, 1), turns: 1 },
                SlotOutcome::Placed { pipe: 2, at: (2, 1), turns: 2 },
            ]
        );
        assert!(pipes[0].fits(East, South));
        assert!(pipes[1].fits(North, East));
        assert!(pipes[2].fits(West, South));
        for x in 0..3 {
            assert!(grid.is_flooded(x, 1));
            assert_eq!(grid.cell(x, 1).unwrap().color.as_deref(), Some("R"));
        }
        assert!(!grid.is_flooded(0, 0));
    }

    #[test]
    fn test_skips_already_placed_pipes() {
        let mut grid = Grid::new(4, 3);
        let mut pipes = vec![
            Pipe::new("P1", [East, South]),
            Pipe::new("P2", [East, South]),
        ];
        pipes[0].position = Some((0, 3));

        let outcomes = place_pipes(&mut grid, &source_at((0, 0)), "R", &mut pipes, &PLACEMENT_TEMPLATE[..1]);

        assert_eq!(outcomes, vec![SlotOutcome::Placed { pipe: 1, at: (0, 1), turns: 0 }]);
        assert_eq!(pipes[0].position, Some((0, 3)), "placed pipes must not move");
    }

    #[test]
    fn test_shortage_leaves_slot_empty() {
        let mut grid = Grid::new(3, 3);
        let mut pipes = vec![Pipe::new("P1", [East, South]), Pipe::new("P2", [North, East])];

        let outcomes = place_pipes(&mut grid, &source_at((0, 0)), "R", &mut pipes, &PLACEMENT_TEMPLATE);

        assert!(outcomes[0].is_placed());
        assert!(outcomes[1].is_placed());
        assert_eq!(outcomes[2], SlotOutcome::Shortage { at: (2, 1) });
        assert!(!grid.is_flooded(2, 1));
    }

    #[test]
    fn test_misfit_pipes_stay_unplaced() {
        let mut grid = Grid::new(3, 3);
        let mut pipes = vec![
            Pipe::new("P1", [North, South]),
            Pipe::new("P2", [North, South]),
            Pipe::new("P3", [North, South]),
        ];

        let outcomes = place_pipes(&mut grid, &source_at((0, 0)), "R", &mut pipes, &PLACEMENT_TEMPLATE);

        assert_eq!(
            outcomes,
            vec![
                SlotOutcome::Misfit { pipe: 0, at: (0, 1) },
                SlotOutcome::Misfit { pipe: 1, at: (1, 1) },
                SlotOutcome::Misfit { pipe: 2, at: (2, 1) },
            ]
        );
        for pipe in &pipes {
            assert_eq!(pipe.ports, [North, South]);
            assert!(!pipe.is_placed());
        }
        assert_eq!(grid.flooded_count(), 0);
    }

    #[test]
    fn test_misfit_is_not_offered_to_later_slots() {
        let mut grid = Grid::new(3, 3);
        let mut pipes = vec![Pipe::new("P1", [North, South])];

        let outcomes = place_pipes(&mut grid, &source_at((0, 0)), "R", &mut pipes, &PLACEMENT_TEMPLATE);

        assert_eq!(
            outcomes,
            vec![
                SlotOutcome::Misfit { pipe: 0, at: (0, 1) },
                SlotOutcome::Shortage { at: (1, 1) },
                SlotOutcome::Shortage { at: (2, 1) },
            ]
        );
    }

    #[test]
    fn test_later_slots_take_later_pipes_after_a_misfit() {
        let mut grid = Grid::new(3, 3);
        let mut pipes = vec![
            Pipe::new("P1", [North, South]),
            Pipe::new("P2", [North, East]),
            Pipe::new("P3", [West, South]),
        ];

        let outcomes = place_pipes(&mut grid, &source_at((0, 0)), "R", &mut pipes, &PLACEMENT_TEMPLATE);

        assert_eq!(
            outcomes,
            vec![
                SlotOutcome::Misfit { pipe: 0, at: (0, 1) },
                SlotOutcome::Placed { pipe: 1, at: (1, 1), turns: 0 },
                SlotOutcome::Placed { pipe: 2, at: (2, 1), turns: 0 },
            ]
        );
        assert!(!pipes[0].is_placed());
        assert_eq!(pipes[1].position, Some((1, 1)));
        assert_eq!(pipes[2].position, Some((2, 1)));
        assert!(!grid.is_flooded(0, 1));
    }

    #[test]
    fn test_off_board_slot_consumes_nothing() {
        let mut grid = Grid::new(2, 2);
        let mut pipes = vec![
            Pipe::new("P1", [East, South]),
            Pipe::new("P2", [North, East]),
            Pipe::new("P3", [West, South]),
        ];

        let outcomes = place_pipes(&mut grid, &source_at((0, 0)), "R", &mut pipes, &PLACEMENT_TEMPLATE);

        assert_eq!(outcomes[2], SlotOutcome::OffBoard { at: Some((2, 1)) });
        assert!(!pipes[2].is_placed());
    }

    #[test]
    fn test_source_at_coordinate_limit_places_nothing() {
        let mut grid = Grid::new(3, 3);
        let mut pipes = vec![Pipe::new("P1", [East, South])];

        let outcomes = place_pipes(&mut grid, &source_at((0, i32::MAX)), "R", &mut pipes, &PLACEMENT_TEMPLATE);

        assert_eq!(outcomes, vec![SlotOutcome::OffBoard { at: None }; 3]);
        assert!(!pipes[0].is_placed());
        assert_eq!(grid.flooded_count(), 0);
    }

    #[test]
    fn test_placement_overwrites_foreign_colour() {
        let mut grid = Grid::new(3, 3);
        grid.set_flow(0, 1, "B");
        let mut pipes = vec![Pipe::new("P1", [East, South])];

        place_pipes(&mut grid, &source_at((0, 0)), "R", &mut pipes, &PLACEMENT_TEMPLATE[..1]);

        assert_eq!(grid.cell(0, 1).unwrap().color.as_deref(), Some("R"));
    }
}
