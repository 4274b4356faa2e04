//! Score calculation for detected words.

use super::bonus::bonus_at;
use super::detector::detect_words;
use super::types::{Board, Direction, Placement, WordSpan};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Flat bonus for playing a full rack in one turn.
pub const BINGO_BONUS: u32 = 50;

/// Number of new tiles that earns the bingo bonus.
pub const BINGO_TILES: usize = 7;

/// A word and the points it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordScore {
    /// The scored word.
    pub word: String,
    /// Points after premiums.
    pub score: u32,
}

/// Itemized score for one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// The word along the play direction.
    pub main_word: WordScore,
    /// Cross words, in detection order.
    pub secondary_words: Vec<WordScore>,
    /// 50 for a seven-tile play, otherwise 0.
    pub bingo_bonus: u32,
    /// Tiles added to the board by the move.
    pub new_placements: Vec<Placement>,
    /// Every word that contributed to the score.
    pub all_scored_words: Vec<WordSpan>,
    /// Why the move could not be scored, if it could not.
    pub error: Option<String>,
}

impl ScoreBreakdown {
    /// A breakdown carrying only an error.
    fn failed(new_placements: Vec<Placement>, error: String) -> Self {
        Self {
            main_word: WordScore {
                word: String::new(),
                score: 0,
            },
            secondary_words: Vec::new(),
            bingo_bonus: 0,
            new_placements,
            all_scored_words: Vec::new(),
            error: Some(error),
        }
    }

    /// Main word plus cross words plus bingo.
    pub fn total(&self) -> u32 {
        self.main_word.score
            + self.secondary_words.iter().map(|w| w.score).sum::<u32>()
            + self.bingo_bonus
    }

    /// True if scoring succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Scores one word.
///
/// Letter and word premiums apply only under tiles placed this turn.
/// Word premiums multiply the sum after letter premiums and compose with
/// each other.
pub fn score_word(span: &WordSpan) -> u32 {
    let mut sum = 0;
    let mut word_multiplier = 1;
    for tile in &span.tiles {
        let value = tile.tile().points();
        if tile.is_new {
            let bonus = bonus_at(tile.row, tile.col);
            sum += value * bonus.letter_multiplier();
            word_multiplier *= bonus.word_multiplier();
        } else {
            sum += value;
        }
    }
    sum * word_multiplier
}

/// Detects and scores every word a move forms.
///
/// Never fails: detection problems are reported in
/// [`ScoreBreakdown::error`]. Legality is the validation pipeline's concern.
#[instrument(
    skip(board, placements),
    fields(placements = placements.len(), direction = %direction)
)]
pub fn score_play(
    board: &Board,
    placements: &[Placement],
    direction: Direction,
) -> ScoreBreakdown {
    let new_placements: Vec<Placement> =
        placements.iter().filter(|p| p.is_new).copied().collect();

    let words = match detect_words(board, placements, direction) {
        Ok(words) => words,
        Err(e) => {
            debug!(error = %e, "Move could not be scored");
            return ScoreBreakdown::failed(new_placements, e.to_string());
        }
    };

    let main_word = WordScore {
        word: words.primary.word.clone(),
        score: score_word(&words.primary),
    };
    let secondary_words: Vec<WordScore> = words
        .secondary
        .iter()
        .map(|w| WordScore {
            word: w.word.clone(),
            score: score_word(w),
        })
        .collect();
    let bingo_bonus = if new_placements.len() == BINGO_TILES {
        BINGO_BONUS
    } else {
        0
    };

    let breakdown = ScoreBreakdown {
        main_word,
        secondary_words,
        bingo_bonus,
        new_placements,
        all_scored_words: words.all().cloned().collect(),
        error: None,
    };
    debug!(total = breakdown.total(), bingo = bingo_bonus, "Move scored");
    breakdown
}
