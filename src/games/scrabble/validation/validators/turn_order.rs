//! Turn order: only the active player may submit.

use super::super::candidate::{MoveCandidate, ValidationContext};
use super::super::pipeline::{Validator, ValidatorOutcome};
use serde_json::json;

/// Fails if the submitting player is not the active player.
///
/// Passes when either side is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOrderValidator;

#[async_trait::async_trait]
impl Validator for TurnOrderValidator {
    async fn evaluate(
        &self,
        candidate: &MoveCandidate,
        context: &ValidationContext,
    ) -> anyhow::Result<ValidatorOutcome> {
        Ok(match (candidate.player_index, context.active_player) {
            (Some(player), Some(active)) if player != active => ValidatorOutcome::fail_with(
                format!("It is player {}'s turn, not player {}'s", active, player),
                json!({ "player": player, "activePlayer": active }),
            ),
            _ => ValidatorOutcome::pass(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::scrabble::action::Play;
    use crate::games::scrabble::tiles::TileBag;
    use crate::games::scrabble::types::{Board, Direction};

    fn candidate() -> MoveCandidate {
        MoveCandidate::from_play(
            &Play::new("CAT", 7, 7, Direction::Across),
            &Board::new(),
            &TileBag::standard(),
        )
    }

    fn context(active: usize) -> ValidationContext {
        ValidationContext {
            game_id: None,
            active_player: Some(active),
        }
    }

    #[tokio::test]
    async fn test_out_of_turn_rejected() {
        let outcome = TurnOrderValidator
            .evaluate(&candidate().with_player(1), &context(0))
            .await
            .unwrap();
        assert!(!outcome.valid);
    }

    #[tokio::test]
    async fn test_active_or_unknown_player_passes() {
        let v = TurnOrderValidator;
        assert!(v.evaluate(&candidate().with_player(0), &context(0)).await.unwrap().valid);
        assert!(v.evaluate(&candidate(), &context(1)).await.unwrap().valid);
    }
}
