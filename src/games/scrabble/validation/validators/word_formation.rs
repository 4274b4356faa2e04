//! Word formation: the move must resolve into real words and must not
//! sandwich an existing word between new letters.

use super::super::candidate::{MoveCandidate, ValidationContext};
use super::super::pipeline::{Validator, ValidatorOutcome};
use crate::games::scrabble::action::PlacementError;
use crate::games::scrabble::detector::detect_words;
use crate::games::scrabble::types::Placement;
use serde_json::json;
use tracing::{debug, instrument};

/// Finds an existing word along the line that gains new letters on both ends.
///
/// A fragment is a run of at least two pre-existing tiles in `tiles`; a
/// single existing letter crossed by the word is not a fragment in this
/// direction.
pub fn find_sandwich(tiles: &[Placement]) -> Option<String> {
    let mut i = 0;
    while i < tiles.len() {
        if tiles[i].is_new {
            i += 1;
            continue;
        }
        let start = i;
        while i < tiles.len() && !tiles[i].is_new {
            i += 1;
        }
        let run = &tiles[start..i];
        if run.len() >= 2
            && tiles[..start].iter().any(|t| t.is_new)
            && tiles[i..].iter().any(|t| t.is_new)
        {
            return Some(run.iter().map(|t| t.letter).collect());
        }
    }
    None
}

/// Fails on unresolvable placements or a sandwiched existing word.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordFormationValidator;

impl WordFormationValidator {
    /// Synchronous check used by [`Validator::evaluate`].
    #[instrument(skip(candidate), fields(word = %candidate.word))]
    pub fn check(candidate: &MoveCandidate) -> ValidatorOutcome {
        let board = &candidate.board_state;
        let play = match candidate.play() {
            Ok(play) => play,
            Err(e) => return ValidatorOutcome::fail(e.to_string()),
        };
        let placements = match play.placements(board) {
            Ok(placements) => placements,
            Err(e) => return ValidatorOutcome::fail(e.to_string()),
        };
        if !placements.iter().any(|p| p.is_new) {
            return ValidatorOutcome::fail(PlacementError::NoNewTiles.to_string());
        }

        let words = match detect_words(board, &placements, *play.direction()) {
            Ok(words) => words,
            Err(e) => return ValidatorOutcome::fail(e.to_string()),
        };

        let secondary: Vec<&str> = words.secondary.iter().map(|w| w.word.as_str()).collect();
        let data = json!({ "primary": words.primary.word, "secondary": secondary });

        if let Some(fragment) = find_sandwich(&words.primary.tiles) {
            debug!(%fragment, "Existing word extended on both ends");
            let err = PlacementError::ConflictingWordExtension { fragment };
            return ValidatorOutcome::fail_with(err.to_string(), data);
        }
        ValidatorOutcome::pass_with(data)
    }
}

#[async_trait::async_trait]
impl Validator for WordFormationValidator {
    async fn evaluate(
        &self,
        candidate: &MoveCandidate,
        _context: &ValidationContext,
    ) -> anyhow::Result<ValidatorOutcome> {
        Ok(Self::check(candidate))
    }
}
