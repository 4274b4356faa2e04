//! Tile values, the standard tile set, and the tile bag.

use super::types::{Board, Tile};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Number of tiles in the standard set.
pub const TOTAL_TILES: u32 = 100;

/// Number of blanks in the standard set.
pub const STARTING_BLANKS: u32 = 2;

/// Letter counts A..Z in the standard set.
pub const STARTING_LETTERS: [u32; 26] = [
    9, 2, 2, 4, 12, 2, 3, 2, 9, 1, 1, 4, 2, 6, 8, 2, 1, 6, 4, 6, 4, 2, 2, 1, 2, 1,
];

/// Point values A..Z.
pub const LETTER_VALUES: [u32; 26] = [
    1, 3, 3, 2, 1, 4, 2, 4, 1, 8, 5, 1, 3, 1, 1, 3, 10, 1, 1, 1, 1, 4, 4, 8, 4, 10,
];

/// Point value of a letter; zero for anything outside A..Z.
pub fn letter_value(letter: char) -> u32 {
    letter_index(letter).map_or(0, |i| LETTER_VALUES[i])
}

fn letter_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    upper
        .is_ascii_uppercase()
        .then(|| (upper as u8 - b'A') as usize)
}

/// Bucket in the tile bag: a specific letter or a blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum TileKind {
    /// A letter tile, stored uppercase.
    #[display("{}", _0)]
    Letter(char),
    /// A blank tile.
    #[display("BLANK")]
    Blank,
}

impl TileKind {
    /// Letter bucket for `letter`, if it is A..Z (any case).
    pub fn letter(letter: char) -> Option<Self> {
        letter_index(letter).map(|_| TileKind::Letter(letter.to_ascii_uppercase()))
    }

    /// Bucket a board tile is drawn from.
    pub fn of(tile: &Tile) -> Self {
        if tile.is_blank {
            TileKind::Blank
        } else {
            TileKind::Letter(tile.letter.to_ascii_uppercase())
        }
    }

    /// Parses a rack symbol: `?` or `_` is a blank, A..Z a letter.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '?' | '_' => Some(TileKind::Blank),
            c => Self::letter(c),
        }
    }

    /// Point value of a tile from this bucket.
    pub fn points(self) -> u32 {
        match self {
            TileKind::Letter(c) => letter_value(c),
            TileKind::Blank => 0,
        }
    }
}

/// Error raised when the bag cannot cover a withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SupplyError {
    /// Not enough tiles of one kind remain.
    #[display("Insufficient tiles: {} short by {}", kind, shortage)]
    InsufficientTiles {
        /// The bucket that ran out.
        kind: TileKind,
        /// How many more tiles would have been needed.
        shortage: u32,
    },
    /// The letter is not a playable tile.
    #[display("'{}' is not a tile letter", letter)]
    UnknownLetter {
        /// The rejected character.
        letter: char,
    },
}

/// Remaining count of each letter and of blanks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileBag {
    letters: [u32; 26],
    blanks: u32,
}

impl TileBag {
    /// A bag holding the full standard set.
    #[instrument]
    pub fn standard() -> Self {
        Self {
            letters: STARTING_LETTERS,
            blanks: STARTING_BLANKS,
        }
    }

    /// Tiles remaining in one bucket.
    pub fn count(&self, kind: TileKind) -> u32 {
        match kind {
            TileKind::Blank => self.blanks,
            TileKind::Letter(c) => letter_index(c).map_or(0, |i| self.letters[i]),
        }
    }

    /// Total tiles remaining.
    pub fn total(&self) -> u32 {
        self.letters.iter().sum::<u32>() + self.blanks
    }

    fn slot_mut(&mut self, kind: TileKind) -> Result<&mut u32, SupplyError> {
        match kind {
            TileKind::Blank => Ok(&mut self.blanks),
            TileKind::Letter(c) => letter_index(c)
                .map(|i| &mut self.letters[i])
                .ok_or(SupplyError::UnknownLetter { letter: c }),
        }
    }

    /// Removes `n` tiles of one kind.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyError::InsufficientTiles`] if fewer than `n` remain;
    /// the bag is left unchanged.
    #[instrument(skip(self))]
    pub fn take(&mut self, kind: TileKind, n: u32) -> Result<(), SupplyError> {
        let slot = self.slot_mut(kind)?;
        if *slot < n {
            let shortage = n - *slot;
            debug!(%kind, available = *slot, needed = n, "Tile withdrawal refused");
            return Err(SupplyError::InsufficientTiles { kind, shortage });
        }
        *slot -= n;
        Ok(())
    }

    /// Returns `n` tiles of one kind to the bag.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyError::UnknownLetter`] for a non-letter bucket.
    #[instrument(skip(self))]
    pub fn give(&mut self, kind: TileKind, n: u32) -> Result<(), SupplyError> {
        *self.slot_mut(kind)? += n;
        Ok(())
    }

    /// Remaining counts keyed by bucket, including empty buckets.
    pub fn remaining(&self) -> BTreeMap<TileKind, u32> {
        let mut map: BTreeMap<TileKind, u32> = (b'A'..=b'Z')
            .zip(self.letters.iter())
            .map(|(c, &n)| (TileKind::Letter(c as char), n))
            .collect();
        map.insert(TileKind::Blank, self.blanks);
        map
    }

    /// Standard set minus every tile currently on `board`.
    ///
    /// Used to resynchronize after a bulk board restore.
    #[instrument(skip(board), fields(board_tiles = board.tile_count()))]
    pub fn rebuild_from_board(board: &Board) -> Self {
        let mut bag = Self::standard();
        for (row, col, tile) in board.tiles() {
            let kind = TileKind::of(&tile);
            if bag.take(kind, 1).is_err() {
                warn!(row, col, %kind, "Board holds more tiles than the standard set");
            }
        }
        debug!(remaining = bag.total(), "Tile bag rebuilt from board");
        bag
    }

    /// Sum of point values of every remaining tile.
    pub fn point_value(&self) -> u32 {
        self.letters
            .iter()
            .zip(LETTER_VALUES.iter())
            .map(|(n, v)| n * v)
            .sum()
    }
}

impl Default for TileBag {
    fn default() -> Self {
        Self::standard()
    }
}
