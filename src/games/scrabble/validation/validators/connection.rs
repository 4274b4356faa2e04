//! Connection check: the first word covers the center, later words touch
//! the tiles already down.

use super::super::candidate::{MoveCandidate, ValidationContext};
use super::super::pipeline::{Validator, ValidatorOutcome};
use crate::games::scrabble::action::PlacementError;
use crate::games::scrabble::types::{Board, CENTER};
use serde_json::json;
use tracing::{debug, instrument};

/// Fails if the move floats free of the existing tiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionValidator;

impl ConnectionValidator {
    /// Synchronous check used by [`Validator::evaluate`].
    #[instrument(skip(candidate), fields(word = %candidate.word))]
    pub fn check(candidate: &MoveCandidate) -> ValidatorOutcome {
        let play = match candidate.play() {
            Ok(play) => play,
            Err(e) => return ValidatorOutcome::fail(e.to_string()),
        };
        let board = &candidate.board_state;
        let cells: Vec<(usize, usize)> = (0..play.len())
            .map(|i| play.direction().offset(*play.start_row(), *play.start_col(), i))
            .filter(|&(r, c)| Board::within_bounds(r, c))
            .collect();

        if board.is_empty() {
            let covers_center = cells.contains(&(CENTER, CENTER));
            let data = json!({ "firstMove": true, "coversCenter": covers_center });
            return if covers_center {
                ValidatorOutcome::pass_with(data)
            } else {
                ValidatorOutcome::fail_with(PlacementError::MissesCenter.to_string(), data)
            };
        }

        let reuses_existing = cells.iter().any(|&(r, c)| board.is_occupied(r, c));
        let adjacent = candidate
            .new_placements
            .iter()
            .any(|p| board.has_neighbor(p.row, p.col));
        debug!(reuses_existing, adjacent, "Connection evaluated");

        let data = json!({
            "firstMove": false,
            "reusesExisting": reuses_existing,
            "adjacentToExisting": adjacent,
        });
        if reuses_existing || adjacent {
            ValidatorOutcome::pass_with(data)
        } else {
            ValidatorOutcome::fail_with(PlacementError::DisconnectedPlacement.to_string(), data)
        }
    }
}

#[async_trait::async_trait]
impl Validator for ConnectionValidator {
    async fn evaluate(
        &self,
        candidate: &MoveCandidate,
        _context: &ValidationContext,
    ) -> anyhow::Result<ValidatorOutcome> {
        Ok(Self::check(candidate))
    }
}
