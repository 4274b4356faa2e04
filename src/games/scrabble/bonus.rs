//! Premium square layout.

use super::types::BOARD_SIZE;
use serde::{Deserialize, Serialize};

/// Premium marker on a board square.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BonusSquare {
    /// Plain square.
    None,
    /// Doubles the letter placed on it.
    DoubleLetter,
    /// Triples the letter placed on it.
    TripleLetter,
    /// Doubles the word formed through it.
    DoubleWord,
    /// Triples the word formed through it.
    TripleWord,
}

impl BonusSquare {
    /// Factor applied to the letter on this square.
    pub fn letter_multiplier(self) -> u32 {
        match self {
            BonusSquare::DoubleLetter => 2,
            BonusSquare::TripleLetter => 3,
            _ => 1,
        }
    }

    /// Factor applied to the word running through this square.
    pub fn word_multiplier(self) -> u32 {
        match self {
            BonusSquare::DoubleWord => 2,
            BonusSquare::TripleWord => 3,
            _ => 1,
        }
    }
}

const NO: BonusSquare = BonusSquare::None;
const DL: BonusSquare = BonusSquare::DoubleLetter;
const TL: BonusSquare = BonusSquare::TripleLetter;
const DW: BonusSquare = BonusSquare::DoubleWord;
const TW: BonusSquare = BonusSquare::TripleWord;

/// The fixed board layout. The center square is a double word.
pub const BONUS_LAYOUT: [[BonusSquare; BOARD_SIZE]; BOARD_SIZE] = [
    [TW, NO, NO, DL, NO, NO, NO, TW, NO, NO, NO, DL, NO, NO, TW],
    [NO, DW, NO, NO, NO, TL, NO, NO, NO, TL, NO, NO, NO, DW, NO],
    [NO, NO, DW, NO, NO, NO, DL, NO, DL, NO, NO, NO, DW, NO, NO],
    [DL, NO, NO, DW, NO, NO, NO, DL, NO, NO, NO, DW, NO, NO, DL],
    [NO, NO, NO, NO, DW, NO, NO, NO, NO, NO, DW, NO, NO, NO, NO],
    [NO, TL, NO, NO, NO, TL, NO, NO, NO, TL, NO, NO, NO, TL, NO],
    [NO, NO, DL, NO, NO, NO, DL, NO, DL, NO, NO, NO, DL, NO, NO],
    [TW, NO, NO, DL, NO, NO, NO, DW, NO, NO, NO, DL, NO, NO, TW],
    [NO, NO, DL, NO, NO, NO, DL, NO, DL, NO, NO, NO, DL, NO, NO],
    [NO, TL, NO, NO, NO, TL, NO, NO, NO, TL, NO, NO, NO, TL, NO],
    [NO, NO, NO, NO, DW, NO, NO, NO, NO, NO, DW, NO, NO, NO, NO],
    [DL, NO, NO, DW, NO, NO, NO, DL, NO, NO, NO, DW, NO, NO, DL],
    [NO, NO, DW, NO, NO, NO, DL, NO, DL, NO, NO, NO, DW, NO, NO],
    [NO, DW, NO, NO, NO, TL, NO, NO, NO, TL, NO, NO, NO, DW, NO],
    [TW, NO, NO, DL, NO, NO, NO, TW, NO, NO, NO, DL, NO, NO, TW],
];

/// Premium at `(row, col)`; off-board cells are plain.
pub fn bonus_at(row: usize, col: usize) -> BonusSquare {
    BONUS_LAYOUT
        .get(row)
        .and_then(|r| r.get(col))
        .copied()
        .unwrap_or(BonusSquare::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_double_word() {
        assert_eq!(bonus_at(7, 7), BonusSquare::DoubleWord);
        assert_eq!(bonus_at(7, 8), BonusSquare::None);
        assert_eq!(bonus_at(7, 9), BonusSquare::None);
    }

    #[test]
    fn test_layout_is_symmetric() {
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                assert_eq!(bonus_at(r, c), bonus_at(c, r));
                assert_eq!(bonus_at(r, c), bonus_at(14 - r, 14 - c));
            }
        }
    }

    #[test]
    fn test_premium_counts() {
        let count = |kind| BONUS_LAYOUT.iter().flatten().filter(|&&b| b == kind).count();
        assert_eq!(count(BonusSquare::TripleWord), 8);
        assert_eq!(count(BonusSquare::DoubleWord), 17);
        assert_eq!(count(BonusSquare::TripleLetter), 12);
        assert_eq!(count(BonusSquare::DoubleLetter), 24);
    }
}
