//! First-class play actions.
//!
//! A play names a word, where it starts, and which way it runs. It is the
//! player's intent; resolving it against a board yields the placements
//! that the rest of the engine reasons about.

use super::types::{Board, Direction, Placement};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// A word played from an anchor cell in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize, Getters)]
#[display("{} {} at ({}, {})", word, direction, start_row, start_col)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    /// Word as typed by the player (stored uppercase).
    word: String,
    /// Row of the first letter.
    start_row: usize,
    /// Column of the first letter.
    start_col: usize,
    /// Direction the word runs.
    direction: Direction,
    /// Indices into `word` that are played with blank tiles.
    #[serde(default)]
    blank_indices: BTreeSet<usize>,
}

impl Play {
    /// Creates a play with no blanks.
    #[instrument]
    pub fn new(word: &str, start_row: usize, start_col: usize, direction: Direction) -> Self {
        Self {
            word: word.to_ascii_uppercase(),
            start_row,
            start_col,
            direction,
            blank_indices: BTreeSet::new(),
        }
    }

    /// Marks the given word indices as blank tiles.
    pub fn with_blanks(mut self, blank_indices: impl IntoIterator<Item = usize>) -> Self {
        self.blank_indices = blank_indices.into_iter().collect();
        self
    }

    /// Number of letters in the word.
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    /// True if the word has no letters.
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Cell of the last letter along the play direction, ignoring the board edge.
    pub fn end_cell(&self) -> (usize, usize) {
        self.direction.offset(
            self.start_row,
            self.start_col,
            self.len().saturating_sub(1),
        )
    }

    /// True if every letter of the word lands on the board.
    pub fn fits_on_board(&self) -> bool {
        let (row, col) = self.end_cell();
        !self.is_empty() && Board::within_bounds(row, col)
    }

    /// Resolves every letter of the word against `board`.
    ///
    /// Letters landing on occupied cells are reused tiles (`is_new == false`);
    /// the rest are new tiles. Cells beyond the board edge are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::LetterMismatch`] if the word disagrees with a
    /// tile already on the board.
    #[instrument(
        skip(board),
        fields(
            word = %self.word,
            row = self.start_row,
            col = self.start_col,
            direction = %self.direction
        )
    )]
    pub fn placements(&self, board: &Board) -> Result<Vec<Placement>, PlacementError> {
        let mut placements = Vec::with_capacity(self.len());
        for (index, letter) in self.word.chars().enumerate() {
            let (row, col) = self.direction.offset(self.start_row, self.start_col, index);
            if !Board::within_bounds(row, col) {
                debug!(row, col, index, "Skipping letter beyond board edge");
                continue;
            }
            match board.get(row, col) {
                Some(existing) if existing.letter != letter => {
                    return Err(PlacementError::LetterMismatch {
                        row,
                        col,
                        expected: letter,
                        found: existing.letter,
                    });
                }
                Some(existing) => placements.push(Placement {
                    row,
                    col,
                    letter,
                    is_blank: existing.is_blank,
                    word_index: index,
                    is_new: false,
                }),
                None => placements.push(Placement {
                    row,
                    col,
                    letter,
                    is_blank: self.blank_indices.contains(&index),
                    word_index: index,
                    is_new: true,
                }),
            }
        }
        Ok(placements)
    }

    /// Only the tiles this play adds to `board`.
    ///
    /// # Errors
    ///
    /// See [`Play::placements`].
    pub fn new_placements(&self, board: &Board) -> Result<Vec<Placement>, PlacementError> {
        Ok(self
            .placements(board)?
            .into_iter()
            .filter(|p| p.is_new)
            .collect())
    }
}

/// Reasons a placement cannot form a legal play.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PlacementError {
    /// Word, anchor or direction was not supplied.
    #[display("Missing required move data: {}", field)]
    MissingRequiredData {
        /// Name of the absent field.
        field: &'static str,
    },
    /// The word runs off the board.
    #[display("Word extends beyond the board (ends at row {}, col {})", end_row, end_col)]
    BoundaryViolation {
        /// Row the last letter would land on.
        end_row: usize,
        /// Column the last letter would land on.
        end_col: usize,
    },
    /// The word does not touch any existing tile.
    #[display("New words must connect to existing words.")]
    DisconnectedPlacement,
    /// The first word on the board does not cover the center.
    #[display("The first word must cover the center square.")]
    MissesCenter,
    /// The play adds no tiles.
    #[display("At least one new tile must be placed")]
    NoNewTiles,
    /// New letters were added on both ends of an existing word.
    #[display("Cannot extend the existing word '{}' on both ends", fragment)]
    ConflictingWordExtension {
        /// The existing word that would be sandwiched.
        fragment: String,
    },
    /// The word disagrees with a tile already on the board.
    #[display("Letter '{}' conflicts with '{}' already at ({}, {})", expected, found, row, col)]
    LetterMismatch {
        /// Board row.
        row: usize,
        /// Board column.
        col: usize,
        /// Letter the word needs there.
        expected: char,
        /// Letter already on the board.
        found: char,
    },
    /// The tiles along the play direction spell fewer than two letters.
    #[display("A word needs at least two letters")]
    WordTooShort,
    /// New tiles leave a gap along the play direction.
    #[display("New tiles must form a single contiguous word")]
    NotContiguous,
    /// New tiles do not share one row or column.
    #[display("New tiles must lie in a single line")]
    NotCollinear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::scrabble::types::Tile;

    #[test]
    fn test_play_display_names_word_direction_and_anchor() {
        let play = Play::new("toque", 7, 9, Direction::Down);
        assert_eq!(play.to_string(), "TOQUE down at (7, 9)");
    }

    #[test]
    fn test_placements_on_empty_board_are_new() {
        let play = Play::new("cat", 7, 7, Direction::Across);
        let placements = play.placements(&Board::new()).unwrap();
        assert_eq!(placements.len(), 3);
        assert!(placements.iter().all(|p| p.is_new));
        assert_eq!(placements[2].col, 9);
        assert_eq!(placements[0].letter, 'C');
    }

    #[test]
    fn test_placements_reuse_existing_tiles() {
        let mut board = Board::new();
        board.set(7, 7, Tile::letter('C'));
        let play = Play::new("CAT", 7, 7, Direction::Down);
        let placements = play.placements(&board).unwrap();
        assert!(!placements[0].is_new);
        assert!(placements[1].is_new);
        assert_eq!(play.new_placements(&board).unwrap().len(), 2);
    }

    #[test]
    fn test_blank_indices_mark_new_tiles() {
        let play = Play::new("CAT", 7, 7, Direction::Across).with_blanks([1]);
        let placements = play.placements(&Board::new()).unwrap();
        assert!(!placements[0].is_blank);
        assert!(placements[1].is_blank);
    }

    #[test]
    fn test_letter_mismatch() {
        let mut board = Board::new();
        board.set(7, 8, Tile::letter('O'));
        let play = Play::new("CAT", 7, 7, Direction::Across);
        assert!(matches!(
            play.placements(&board),
            Err(PlacementError::LetterMismatch { expected: 'A', found: 'O', .. })
        ));
    }

    #[test]
    fn test_end_cell_and_fit() {
        let play = Play::new("HELLO", 7, 11, Direction::Across);
        assert_eq!(play.end_cell(), (7, 15));
        assert!(!play.fits_on_board());
        assert!(Play::new("HELLO", 10, 3, Direction::Down).fits_on_board());
    }

    #[test]
    fn test_off_board_letters_are_skipped() {
        let play = Play::new("HELLO", 7, 12, Direction::Across);
        assert_eq!(play.placements(&Board::new()).unwrap().len(), 3);
    }
}
