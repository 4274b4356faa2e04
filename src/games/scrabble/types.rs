//! Core domain types for the Scrabble board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 15;

/// Row and column of the center square that the first word must cover.
pub const CENTER: usize = 7;

/// A letter tile sitting on the board.
///
/// Blank tiles carry the letter they stand for but are worth zero points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    /// Uppercase letter shown on the tile.
    pub letter: char,
    /// True if this tile is a blank standing in for `letter`.
    pub is_blank: bool,
}

impl Tile {
    /// Creates a regular letter tile.
    pub fn letter(letter: char) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            is_blank: false,
        }
    }

    /// Creates a blank tile standing in for `letter`.
    pub fn blank(letter: char) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            is_blank: true,
        }
    }

    /// Point value of this tile (zero for blanks).
    pub fn points(&self) -> u32 {
        if self.is_blank {
            0
        } else {
            super::tiles::letter_value(self.letter)
        }
    }
}

/// Direction a word is played in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Left to right along a row.
    Across,
    /// Top to bottom along a column.
    Down,
}

impl Direction {
    /// The axis crossing this one.
    pub fn perpendicular(self) -> Self {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// Cell reached by moving `offset` steps from `(row, col)`.
    pub fn offset(self, row: usize, col: usize, offset: usize) -> (usize, usize) {
        match self {
            Direction::Across => (row, col + offset),
            Direction::Down => (row + offset, col),
        }
    }

    /// The next cell along this direction, if it is on the board.
    pub fn next(self, row: usize, col: usize) -> Option<(usize, usize)> {
        let (r, c) = self.offset(row, col, 1);
        Board::within_bounds(r, c).then_some((r, c))
    }

    /// The previous cell along this direction, if it is on the board.
    pub fn prev(self, row: usize, col: usize) -> Option<(usize, usize)> {
        match self {
            Direction::Across => col.checked_sub(1).map(|c| (row, c)),
            Direction::Down => row.checked_sub(1).map(|r| (r, col)),
        }
    }

    /// Coordinate that varies along this direction.
    pub fn main_axis(self, row: usize, col: usize) -> usize {
        match self {
            Direction::Across => col,
            Direction::Down => row,
        }
    }

    /// Coordinate that stays fixed along this direction.
    pub fn cross_axis(self, row: usize, col: usize) -> usize {
        match self {
            Direction::Across => row,
            Direction::Down => col,
        }
    }

    /// Builds `(row, col)` from a main-axis and cross-axis coordinate.
    pub fn cell(self, main: usize, cross: usize) -> (usize, usize) {
        match self {
            Direction::Across => (cross, main),
            Direction::Down => (main, cross),
        }
    }
}

/// 15x15 board of optional tiles, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Option<Tile>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    #[instrument]
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// True if `(row, col)` lies on the board.
    pub fn within_bounds(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    /// Tile at `(row, col)`, or `None` if the cell is empty or off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// True if a tile sits at `(row, col)`.
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }

    /// Writes a tile. Only the ledger and scratch boards mutate cells.
    ///
    /// Out-of-bounds writes are ignored.
    pub(crate) fn set(&mut self, row: usize, col: usize, tile: Tile) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = Some(tile);
        }
    }

    /// True if no tile has been placed anywhere.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    /// Number of tiles on the board.
    pub fn tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Iterates every placed tile with its coordinates.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.map(|t| (r, c, t)))
        })
    }

    /// True if any 4-neighbor of `(row, col)` holds a tile.
    pub fn has_neighbor(&self, row: usize, col: usize) -> bool {
        Direction::Across
            .prev(row, col)
            .into_iter()
            .chain(Direction::Across.next(row, col))
            .chain(Direction::Down.prev(row, col))
            .chain(Direction::Down.next(row, col))
            .any(|(r, c)| self.is_occupied(r, c))
    }

    /// Formats the board as text, `.` for empty cells and lowercase for blanks.
    pub fn display(&self) -> String {
        let mut result = String::from("   ");
        for col in 0..BOARD_SIZE {
            result.push_str(&format!("{:>2}", col));
        }
        result.push('\n');
        for (r, row) in self.cells.iter().enumerate() {
            result.push_str(&format!("{:>2} ", r));
            for cell in row {
                let symbol = match cell {
                    None => '.',
                    Some(t) if t.is_blank => t.letter.to_ascii_lowercase(),
                    Some(t) => t.letter,
                };
                result.push(' ');
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// One tile's role in a candidate move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Board row.
    pub row: usize,
    /// Board column.
    pub col: usize,
    /// Letter the tile shows.
    pub letter: char,
    /// True if the tile is a blank.
    pub is_blank: bool,
    /// Index of the tile within its word.
    pub word_index: usize,
    /// False if the tile was already on the board before this move.
    pub is_new: bool,
}

impl Placement {
    /// The tile this placement puts on the board.
    pub fn tile(&self) -> Tile {
        Tile {
            letter: self.letter,
            is_blank: self.is_blank,
        }
    }
}

/// A fully traced word (existing and new tiles) with its geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSpan {
    /// The word spelled by the tiles.
    pub word: String,
    /// Direction the word runs.
    pub direction: Direction,
    /// Row of the first tile.
    pub start_row: usize,
    /// Column of the first tile.
    pub start_col: usize,
    /// Tiles in reading order.
    pub tiles: Vec<Placement>,
    /// True for the word along the play direction.
    pub is_primary: bool,
}

impl WordSpan {
    /// Number of tiles in this word placed during the current move.
    pub fn new_tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_new).count()
    }
}
