//! Board integrity: a client-submitted post-move board must be exactly the
//! current board plus this move's new tiles.

use super::super::candidate::{MoveCandidate, ValidationContext};
use super::super::pipeline::{Validator, ValidatorOutcome};
use crate::games::scrabble::types::{BOARD_SIZE, Board};
use serde_json::json;
use tracing::{instrument, warn};

/// Fails if the submitted board adds, drops or alters any other tile.
///
/// Passes when no board was submitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardIntegrityValidator;

impl BoardIntegrityValidator {
    /// Synchronous check used by [`Validator::evaluate`].
    #[instrument(skip(candidate), fields(word = %candidate.word))]
    pub fn check(candidate: &MoveCandidate) -> ValidatorOutcome {
        let Some(submitted) = &candidate.submitted_board else {
            return ValidatorOutcome::pass_with(json!({ "checked": false }));
        };

        let mut expected: Board = candidate.board_state.clone();
        for p in candidate.new_placements.iter().filter(|p| p.is_new) {
            expected.set(p.row, p.col, p.tile());
        }

        let mut mismatches = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let want = expected.get(row, col);
                let got = submitted.get(row, col);
                if want != got {
                    mismatches.push(json!({
                        "row": row,
                        "col": col,
                        "expected": want,
                        "found": got,
                    }));
                }
            }
        }

        if mismatches.is_empty() {
            ValidatorOutcome::pass_with(json!({ "checked": true }))
        } else {
            warn!(cells = mismatches.len(), "Submitted board diverges from the move");
            ValidatorOutcome::fail_with(
                format!(
                    "Submitted board does not match the move ({} cells differ)",
                    mismatches.len()
                ),
                json!({ "checked": true, "mismatches": mismatches }),
            )
        }
    }
}

#[async_trait::async_trait]
impl Validator for BoardIntegrityValidator {
    async fn evaluate(
        &self,
        candidate: &MoveCandidate,
        _context: &ValidationContext,
    ) -> anyhow::Result<ValidatorOutcome> {
        Ok(Self::check(candidate))
    }
}
