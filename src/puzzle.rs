//! Puzzle definition and its text format.
//!
//! A puzzle file is a stream of whitespace-separated tokens grouped into
//! sections, each introduced by a bracketed header:
//!
//! ```text
//! [Board]     <rows> <cols>
//! [Sources]   <n> { <id> <color> <x> <y> <k> <port>*k }*n
//! [Consumers] <n> { <id> <color> <x> <y> <k> <port>*k }*n
//! [Pipes]     <n> { <id> <k> <port>*k }*n
//! [Phases]    <n> <color>*n
//! ```
//!
//! Ports are written `N`, `E`, `S` or `W`. Sections may come in any order;
//! stray tokens between sections are skipped.

use std::fs;
use std::num::ParseIntError;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use log::{debug, warn};
use thiserror::Error;

use crate::geometry::Direction;
use crate::pipes::{Color, Consumer, Coord, Pipe, Source};
use crate::solver::{self, Solution};

/// Everything loaded from a puzzle file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Puzzle {
    pub rows: usize,
    pub cols: usize,
    pub sources: Vec<Source>,
    pub consumers: Vec<Consumer>,
    /// The shared pipe pool, in declaration order.
    pub pipes: Vec<Pipe>,
    /// Phase colours in the order they are processed.
    pub phases: Vec<Color>,
}

impl Puzzle {
    /// Creates a puzzle with an empty `rows x cols` board and nothing on it.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Reads and parses a puzzle file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        Ok(text.parse()?)
    }

    /// Runs every phase against this puzzle. See [`solver::solve`].
    pub fn solve(&mut self) -> Solution {
        solver::solve(self)
    }

    /// Pipes that have been put on the board, in pool order.
    pub fn placed_pipes(&self) -> impl Iterator<Item = (&Pipe, Coord)> {
        self.pipes
            .iter()
            .filter_map(|pipe| pipe.position.map(|at| (pipe, at)))
    }
}

/// Reasons a puzzle description could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(&'static str),
    #[error("invalid {what} {token:?}")]
    InvalidNumber {
        what: &'static str,
        token: String,
        source: ParseIntError,
    },
    #[error("invalid port {0:?}, expected one of N, E, S, W")]
    InvalidPort(String),
    #[error("pipe {id} has {count} ports, expected 2")]
    PortCount { id: String, count: usize },
    #[error("missing [Board] section")]
    MissingBoard,
    #[error("board of {rows}x{cols} cells is too large")]
    BoardTooLarge { rows: usize, cols: usize },
}

/// Reasons [`Puzzle::load`] can fail.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read puzzle: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse puzzle: {0}")]
    Parse(#[from] ParseError),
}

/// Token cursor over a puzzle description.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn word(&mut self, what: &'static str) -> Result<&'a str, ParseError> {
        self.inner.next().ok_or(ParseError::UnexpectedEof(what))
    }

    fn number<T: FromStr<Err = ParseIntError>>(&mut self, what: &'static str) -> Result<T, ParseError> {
        let token = self.word(what)?;
        token.parse().map_err(|source| ParseError::InvalidNumber {
            what,
            token: token.to_owned(),
            source,
        })
    }

    fn coord(&mut self) -> Result<Coord, ParseError> {
        Ok((self.number("x coordinate")?, self.number("y coordinate")?))
    }

    /// Reads a port count followed by that many ports.
    fn ports(&mut self) -> Result<Vec<Direction>, ParseError> {
        let count: usize = self.number("port count")?;
        (0..count)
            .map(|_| {
                let token = self.word("port")?;
                token
                    .parse()
                    .map_err(|_| ParseError::InvalidPort(token.to_owned()))
            })
            .collect()
    }

    /// Reads a record count and then `count` records with `read`.
    fn records<T>(
        &mut self,
        what: &'static str,
        mut read: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let count: usize = self.number(what)?;
        (0..count).map(|_| read(self)).collect()
    }
}

fn read_source(tokens: &mut Tokens<'_>) -> Result<Source, ParseError> {
    let id = tokens.word("source id")?;
    let color = tokens.word("source colour")?;
    let mut source = Source::new(id, color, tokens.coord()?);
    source.outputs = tokens.ports()?;
    Ok(source)
}

fn read_consumer(tokens: &mut Tokens<'_>) -> Result<Consumer, ParseError> {
    let id = tokens.word("consumer id")?;
    let color = tokens.word("consumer colour")?;
    let mut consumer = Consumer::new(id, color, tokens.coord()?);
    consumer.inputs = tokens.ports()?;
    Ok(consumer)
}

fn read_pipe(tokens: &mut Tokens<'_>) -> Result<Pipe, ParseError> {
    let id = tokens.word("pipe id")?;
    let ports = tokens.ports()?;
    let count = ports.len();
    let ports: [Direction; 2] = ports.try_into().map_err(|_| ParseError::PortCount {
        id: id.to_owned(),
        count,
    })?;
    Ok(Pipe::new(id, ports))
}

impl FromStr for Puzzle {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens::new(text);
        let mut board = None;
        let mut puzzle = Puzzle::default();

        while let Some(header) = tokens.inner.next() {
            match header {
                "[Board]" => {
                    board = Some((tokens.number("row count")?, tokens.number("column count")?));
                }
                "[Sources]" => puzzle.sources = tokens.records("source count", read_source)?,
                "[Consumers]" => puzzle.consumers = tokens.records("consumer count", read_consumer)?,
                "[Pipes]" => puzzle.pipes = tokens.records("pipe count", read_pipe)?,
                "[Phases]" => {
                    puzzle.phases = tokens.records("phase count", |t| {
                        t.word("phase colour").map(str::to_owned)
                    })?;
                }
                other => warn!("skipping unexpected token {other:?}"),
            }
        }

        let (rows, cols): (usize, usize) = board.ok_or(ParseError::MissingBoard)?;
        if rows.checked_mul(cols).is_none() {
            return Err(ParseError::BoardTooLarge { rows, cols });
        }
        puzzle.rows = rows;
        puzzle.cols = cols;
        debug!(
            "loaded {rows}x{cols} board: {} sources, {} consumers, {} pipes, {} phases",
            puzzle.sources.len(),
            puzzle.consumers.len(),
            puzzle.pipes.len(),
            puzzle.phases.len()
        );
        Ok(puzzle)
    }
}
