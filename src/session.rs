//! Per-game session: validation, scoring and the ledger behind one facade.
//!
//! A session is constructed per game and owned by its caller. Submit and
//! undo take `&mut self`, so overlapping mutations of one game cannot be
//! expressed.

use crate::config::EngineConfig;
use crate::games::scrabble::endgame::{Settlement, SettlementError, settle};
use crate::games::scrabble::ledger::{LedgerError, TurnData, TurnLedger, TurnRecord};
use crate::games::scrabble::scoring::{ScoreBreakdown, score_play};
use crate::games::scrabble::store::{StoreError, TurnStore};
use crate::games::scrabble::tiles::TileKind;
use crate::games::scrabble::types::Board;
use crate::games::scrabble::validation::{
    DEFAULT_PIPELINE, MoveCandidate, PipelineError, SUBMISSION_PIPELINE, ValidationContext,
    ValidationPipeline, ValidationResult,
};
use crate::games::scrabble::Play;
use derive_more::{Display, Error, From};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Session failures.
///
/// Rejected moves are not errors; see [`SubmitOutcome::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// The pipeline could not run.
    #[display("{}", _0)]
    Pipeline(PipelineError),
    /// The ledger refused the turn or the undo.
    #[display("{}", _0)]
    Ledger(LedgerError),
    /// A just-applied turn could not be persisted and was rolled back.
    #[display("Turn rolled back: {}", _0)]
    Store(StoreError),
    /// Settlement input did not match the table.
    #[display("{}", _0)]
    Settlement(SettlementError),
    /// A move passed validation but could not be scored.
    #[display("Move could not be scored: {}", detail)]
    #[from(ignore)]
    Unscorable {
        /// Scoring failure detail.
        detail: String,
    },
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing changed.
    Rejected(ValidationResult),
    /// The turn was applied and persisted.
    Applied {
        /// Ledger entry for the turn.
        record: TurnRecord,
        /// How the score was computed.
        breakdown: ScoreBreakdown,
    },
}

/// One game in progress.
#[derive(Debug)]
pub struct GameSession {
    ledger: TurnLedger,
    pipeline: Arc<ValidationPipeline>,
}

impl GameSession {
    /// Starts a new game.
    #[instrument(skip(game_id, config, pipeline, store))]
    pub fn new(
        game_id: impl Into<String>,
        config: &EngineConfig,
        pipeline: Arc<ValidationPipeline>,
        store: Arc<dyn TurnStore>,
    ) -> Self {
        let ledger = TurnLedger::new(game_id, config.game().player_count, store);
        Self { ledger, pipeline }
    }

    /// Restores a game from stored turn records.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Ledger`] if a record names an unseated player.
    #[instrument(skip(game_id, config, pipeline, store, records), fields(turns = records.len()))]
    pub fn from_records(
        game_id: impl Into<String>,
        config: &EngineConfig,
        pipeline: Arc<ValidationPipeline>,
        store: Arc<dyn TurnStore>,
        records: Vec<TurnRecord>,
    ) -> Result<Self, SessionError> {
        let ledger = TurnLedger::replay(game_id, config.game().player_count, records, store)?;
        Ok(Self { ledger, pipeline })
    }

    /// Board, bag, scores and history.
    pub fn ledger(&self) -> &TurnLedger {
        &self.ledger
    }

    /// Context describing the current turn.
    pub fn context(&self) -> ValidationContext {
        ValidationContext {
            game_id: Some(self.ledger.game_id().clone()),
            active_player: Some(*self.ledger.current_player()),
        }
    }

    /// Candidate for `play` against the current board and bag.
    pub fn candidate(&self, play: &Play) -> MoveCandidate {
        MoveCandidate::from_play(play, self.ledger.board(), self.ledger.bag())
    }

    /// Runs the default pipeline without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Pipeline`] if the default pipeline is not defined.
    #[instrument(skip(self, play), fields(play = %play))]
    pub async fn validate(&self, play: &Play) -> Result<ValidationResult, SessionError> {
        let result = self
            .pipeline
            .run(DEFAULT_PIPELINE, self.candidate(play), self.context())
            .await?;
        Ok(result)
    }

    /// Scores `play` against the current board without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Ledger`] if the play disagrees with the board.
    pub fn preview(&self, play: &Play) -> Result<ScoreBreakdown, SessionError> {
        let placements = play
            .placements(self.ledger.board())
            .map_err(LedgerError::from)?;
        Ok(score_play(self.ledger.board(), &placements, *play.direction()))
    }

    /// Validates, scores, applies and persists a turn for `player`.
    ///
    /// If the store rejects the turn it is rolled back locally and the
    /// store error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] for pipeline, ledger, scoring or store
    /// failures. An illegal move is `Ok(SubmitOutcome::Rejected)`.
    #[instrument(skip(self, play, submitted_board), fields(play = %play))]
    pub async fn submit_turn(
        &mut self,
        player: usize,
        play: &Play,
        submitted_board: Option<Board>,
    ) -> Result<SubmitOutcome, SessionError> {
        let mut candidate = self.candidate(play).with_player(player);
        if let Some(board) = submitted_board {
            candidate = candidate.with_submitted_board(board);
        }
        let result = self
            .pipeline
            .run(SUBMISSION_PIPELINE, candidate, self.context())
            .await?;
        if !result.valid {
            info!(error = ?result.first_error(), "Turn rejected");
            return Ok(SubmitOutcome::Rejected(result));
        }

        let breakdown = self.preview(play)?;
        if let Some(detail) = &breakdown.error {
            return Err(SessionError::Unscorable {
                detail: detail.clone(),
            });
        }

        let record = self
            .ledger
            .apply_turn(&TurnData::new(play.clone(), breakdown.total()))?;

        let store = Arc::clone(self.ledger.store());
        let saved = store.save_turn(self.ledger.game_id(), &record).await;
        if let Err(e) = saved {
            warn!(error = %e, "Persisting turn failed; rolling back");
            self.ledger.discard_last()?;
            return Err(SessionError::Store(e));
        }

        info!(score = record.score, "Turn submitted");
        Ok(SubmitOutcome::Applied { record, breakdown })
    }

    /// Undoes the latest turn. Returns `Ok(false)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Ledger`] with
    /// [`LedgerError::PersistenceSyncFailure`] if the store did not confirm.
    pub async fn undo(&mut self) -> Result<bool, SessionError> {
        Ok(self.ledger.undo_last_turn().await?)
    }

    /// Settles the game ended by `ending_player`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Settlement`] if the racks do not match the table.
    pub fn finish(
        &self,
        ending_player: usize,
        racks: &[Vec<TileKind>],
    ) -> Result<Settlement, SessionError> {
        Ok(settle(
            self.ledger.board(),
            ending_player,
            racks,
            self.ledger.scores(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::scrabble::store::MemoryTurnStore;
    use crate::games::scrabble::types::Direction;

    fn session(store: Arc<MemoryTurnStore>) -> GameSession {
        GameSession::new(
            "s1",
            &EngineConfig::default(),
            Arc::new(ValidationPipeline::default()),
            store,
        )
    }

    #[tokio::test]
    async fn test_submit_persists_turn() {
        let store = Arc::new(MemoryTurnStore::new());
        let mut session = session(Arc::clone(&store));

        let outcome = session
            .submit_turn(0, &Play::new("CAT", 7, 7, Direction::Across), None)
            .await
            .unwrap();
        let SubmitOutcome::Applied { record, breakdown } = outcome else {
            panic!("expected the turn to apply");
        };
        assert_eq!(breakdown.total(), 10);
        assert_eq!(record.score, 10);
        assert_eq!(store.turns("s1").await.len(), 1);
        assert_eq!(*session.ledger().current_player(), 1);
    }

    #[tokio::test]
    async fn test_out_of_turn_rejected() {
        let mut session = session(Arc::new(MemoryTurnStore::new()));
        let outcome = session
            .submit_turn(1, &Play::new("CAT", 7, 7, Direction::Across), None)
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(session.ledger().board().is_empty());
    }

    #[tokio::test]
    async fn test_undo_removes_stored_turn() {
        let store = Arc::new(MemoryTurnStore::new());
        let mut session = session(Arc::clone(&store));
        session
            .submit_turn(0, &Play::new("CAT", 7, 7, Direction::Across), None)
            .await
            .unwrap();

        assert!(session.undo().await.unwrap());
        assert!(store.turns("s1").await.is_empty());
        assert!(!session.undo().await.unwrap());
    }
}
