//! Boundary check: required fields present and the word fits on the board.

use super::super::candidate::{MoveCandidate, ValidationContext};
use super::super::pipeline::{Validator, ValidatorOutcome};
use crate::games::scrabble::action::PlacementError;
use serde_json::json;
use tracing::instrument;

/// Fails if data is missing or the last letter falls off the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryValidator;

impl BoundaryValidator {
    /// Synchronous check used by [`Validator::evaluate`].
    #[instrument(skip(candidate), fields(word = %candidate.word))]
    pub fn check(candidate: &MoveCandidate) -> ValidatorOutcome {
        let play = match candidate.play() {
            Ok(play) => play,
            Err(e) => {
                let field = match &e {
                    PlacementError::MissingRequiredData { field } => *field,
                    _ => "unknown",
                };
                return ValidatorOutcome::fail_with(e.to_string(), json!({ "missing": field }));
            }
        };

        let (end_row, end_col) = play.end_cell();
        let data = json!({ "endRow": end_row, "endCol": end_col });
        if play.fits_on_board() {
            ValidatorOutcome::pass_with(data)
        } else {
            let err = PlacementError::BoundaryViolation { end_row, end_col };
            ValidatorOutcome::fail_with(err.to_string(), data)
        }
    }
}

#[async_trait::async_trait]
impl Validator for BoundaryValidator {
    async fn evaluate(
        &self,
        candidate: &MoveCandidate,
        _context: &ValidationContext,
    ) -> anyhow::Result<ValidatorOutcome> {
        Ok(Self::check(candidate))
    }
}
