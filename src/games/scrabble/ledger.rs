//! Turn ledger: applies validated turns and undoes them exactly.
//!
//! The ledger is the only owner allowed to write the board and the tile
//! bag. Every applied turn records deep snapshots of the board so an undo
//! restores the prior state byte for byte.

use super::action::{PlacementError, Play};
use super::invariants::{InvariantSet, LedgerInvariants};
use super::store::TurnStore;
use super::tiles::{SupplyError, TileBag, TileKind};
use super::types::{Board, Direction, Tile};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A validated move and the score it earned.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TurnData {
    /// The word played.
    pub play: Play,
    /// Points credited to the acting player.
    pub score: u32,
}

/// One applied turn. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    /// Seat that played the turn.
    pub player_index: usize,
    /// Word as played.
    pub word: String,
    /// Play direction.
    pub direction: Direction,
    /// Row of the first letter.
    pub start_row: usize,
    /// Column of the first letter.
    pub start_col: usize,
    /// Word indices played with blanks.
    #[serde(default)]
    pub blank_indices: BTreeSet<usize>,
    /// Points credited.
    pub score: u32,
    /// Board immediately before the turn.
    #[serde(default)]
    pub board_state_before: Board,
    /// Board immediately after the turn. Absent on legacy records.
    #[serde(default)]
    pub board_state_after: Option<Board>,
    /// Acting player's score before the turn.
    #[serde(default)]
    pub player_score_before: i32,
}

impl TurnRecord {
    /// The play this record describes.
    pub fn play(&self) -> Play {
        Play::new(&self.word, self.start_row, self.start_col, self.direction)
            .with_blanks(self.blank_indices.iter().copied())
    }
}

/// Ledger failures.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum LedgerError {
    /// Undo was requested with nothing to undo.
    #[display("No turns to undo")]
    UndoWithHistoryEmpty,
    /// The persistence collaborator did not confirm; local state is unchanged.
    #[display("Persistence sync failed for game '{}': {}", game_id, detail)]
    PersistenceSyncFailure {
        /// Game whose remote history may have diverged.
        game_id: String,
        /// Collaborator's failure detail.
        detail: String,
    },
    /// A record names a seat the table does not have.
    #[display("Player {} is not seated (table of {})", player_index, player_count)]
    PlayerOutOfRange {
        /// Offending seat.
        player_index: usize,
        /// Seats at the table.
        player_count: usize,
    },
    /// The play cannot be placed.
    #[display("{}", _0)]
    #[from]
    Placement(PlacementError),
    /// The bag cannot cover the new tiles.
    #[display("{}", _0)]
    #[from]
    Supply(SupplyError),
}

/// Board, bag, scores and history of one game.
#[derive(Getters)]
pub struct TurnLedger {
    /// Game identifier used with the store.
    game_id: String,
    /// Current board.
    board: Board,
    /// Tiles not yet on the board.
    bag: TileBag,
    /// Score per seat.
    scores: Vec<i32>,
    /// Seat to act next.
    current_player: usize,
    /// Applied turns, oldest first.
    records: Vec<TurnRecord>,
    /// Persistence collaborator.
    store: Arc<dyn TurnStore>,
}

impl std::fmt::Debug for TurnLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnLedger")
            .field("game_id", &self.game_id)
            .field("tiles_on_board", &self.board.tile_count())
            .field("bag", &self.bag.total())
            .field("scores", &self.scores)
            .field("current_player", &self.current_player)
            .field("turns", &self.records.len())
            .finish()
    }
}

impl TurnLedger {
    /// An empty board with a full bag.
    #[instrument(skip(game_id, store))]
    pub fn new(game_id: impl Into<String>, player_count: usize, store: Arc<dyn TurnStore>) -> Self {
        let game_id = game_id.into();
        info!(%game_id, player_count, "Starting new ledger");
        Self {
            game_id,
            board: Board::new(),
            bag: TileBag::standard(),
            scores: vec![0; player_count.max(1)],
            current_player: 0,
            records: Vec::new(),
            store,
        }
    }

    /// Number of seats.
    pub fn player_count(&self) -> usize {
        self.scores.len()
    }

    /// Most recent turn.
    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.records.last()
    }

    #[cfg(test)]
    pub(crate) fn scores_mut(&mut self) -> &mut Vec<i32> {
        &mut self.scores
    }

    /// Applies a validated turn for the current player.
    ///
    /// Either every effect happens (tiles written, bag debited, score
    /// credited, record appended, turn advanced) or none does.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Placement`] if the play runs off the board,
    /// disagrees with existing tiles, or adds nothing; returns
    /// [`LedgerError::Supply`] if the bag cannot cover it.
    #[instrument(
        skip(self, data),
        fields(
            game_id = %self.game_id,
            play = %data.play,
            score = data.score,
            player = self.current_player
        )
    )]
    pub fn apply_turn(&mut self, data: &TurnData) -> Result<TurnRecord, LedgerError> {
        let play = &data.play;
        if !play.fits_on_board() {
            let (end_row, end_col) = play.end_cell();
            return Err(PlacementError::BoundaryViolation { end_row, end_col }.into());
        }
        let new_tiles = play.new_placements(&self.board)?;
        if new_tiles.is_empty() {
            return Err(PlacementError::NoNewTiles.into());
        }

        let mut bag = self.bag.clone();
        for p in &new_tiles {
            bag.take(TileKind::of(&p.tile()), 1)?;
        }

        let player = self.current_player;
        let board_state_before = self.board.clone();
        let player_score_before = self.scores[player];

        for p in &new_tiles {
            self.board.set(p.row, p.col, p.tile());
        }
        self.bag = bag;
        self.scores[player] = player_score_before + data.score as i32;

        let record = TurnRecord {
            player_index: player,
            word: play.word().clone(),
            direction: *play.direction(),
            start_row: *play.start_row(),
            start_col: *play.start_col(),
            blank_indices: play.blank_indices().clone(),
            score: data.score,
            board_state_before,
            board_state_after: Some(self.board.clone()),
            player_score_before,
        };
        self.records.push(record.clone());
        self.current_player = (player + 1) % self.scores.len();

        info!(
            new_tiles = new_tiles.len(),
            total = self.scores[player],
            next = self.current_player,
            "Turn applied"
        );
        self.check_invariants();
        Ok(record)
    }

    /// Undoes the most recent turn once the store confirms deletion.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PersistenceSyncFailure`] if the store does not
    /// confirm; the ledger is left exactly as it was.
    #[instrument(skip(self), fields(game_id = %self.game_id, turns = self.records.len()))]
    pub async fn undo_last_turn(&mut self) -> Result<bool, LedgerError> {
        let Some(record) = self.records.last() else {
            debug!(reason = %LedgerError::UndoWithHistoryEmpty, "Undo ignored");
            return Ok(false);
        };
        let bag = TileBag::rebuild_from_board(&record.board_state_before);

        if let Err(e) = self.store.delete_last_turn(&self.game_id).await {
            warn!(error = %e, "Store did not confirm undo; local state kept");
            return Err(LedgerError::PersistenceSyncFailure {
                game_id: self.game_id.clone(),
                detail: e.to_string(),
            });
        }

        self.restore_last(bag);
        Ok(true)
    }

    /// Rolls back the most recent turn locally without consulting the store.
    ///
    /// Used when persisting a just-applied turn fails.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UndoWithHistoryEmpty`] if there is no turn.
    #[instrument(skip(self), fields(game_id = %self.game_id))]
    pub fn discard_last(&mut self) -> Result<TurnRecord, LedgerError> {
        let record = self.records.last().ok_or(LedgerError::UndoWithHistoryEmpty)?;
        let bag = TileBag::rebuild_from_board(&record.board_state_before);
        self.restore_last(bag).ok_or(LedgerError::UndoWithHistoryEmpty)
    }

    /// Pops the last record and restores its pre-turn board, with `bag`
    /// rebuilt from that board.
    fn restore_last(&mut self, bag: TileBag) -> Option<TurnRecord> {
        let record = self.records.pop()?;
        self.board = record.board_state_before.clone();
        self.bag = bag;
        if let Some(score) = self.scores.get_mut(record.player_index) {
            *score = record.player_score_before;
        }
        self.current_player = record.player_index;
        info!(word = %record.word, player = record.player_index, "Turn undone");
        self.check_invariants();
        Some(record)
    }

    /// Rebuilds a game from stored turn records, oldest first.
    ///
    /// A record's post-turn board is authoritative when present. Legacy
    /// records without one are re-derived from the word and anchor. The bag
    /// is recomputed from the final board.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PlayerOutOfRange`] if a record names a seat
    /// beyond `player_count`.
    #[instrument(skip(game_id, records, store), fields(turns = records.len()))]
    pub fn replay(
        game_id: impl Into<String>,
        player_count: usize,
        records: Vec<TurnRecord>,
        store: Arc<dyn TurnStore>,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Self::new(game_id, player_count, store);
        let count = ledger.scores.len();

        for mut record in records {
            if record.player_index >= count {
                return Err(LedgerError::PlayerOutOfRange {
                    player_index: record.player_index,
                    player_count: count,
                });
            }
            let before = ledger.board.clone();
            let after = match record.board_state_after.take() {
                Some(after) => after,
                None => legacy_board_after(&before, &record),
            };

            record.board_state_before = before;
            record.board_state_after = Some(after.clone());
            record.player_score_before = ledger.scores[record.player_index];
            ledger.scores[record.player_index] += record.score as i32;
            ledger.current_player = (record.player_index + 1) % count;
            ledger.board = after;
            ledger.records.push(record);
        }

        ledger.bag = TileBag::rebuild_from_board(&ledger.board);
        info!(
            tiles_on_board = ledger.board.tile_count(),
            bag = ledger.bag.total(),
            next = ledger.current_player,
            "Ledger replayed"
        );
        if let Err(violations) = LedgerInvariants::check_all(&ledger) {
            for v in violations {
                warn!(invariant = %v.description, "Replayed game violates invariant");
            }
        }
        Ok(ledger)
    }

    fn check_invariants(&self) {
        if let Err(violations) = LedgerInvariants::check_all(self) {
            for v in violations {
                warn!(invariant = %v.description, "Ledger invariant violated");
            }
        }
    }
}

/// Board after a legacy record that lacks its own snapshot.
///
/// Letters are written into empty cells along the play line; letters that
/// fall off the board or land on an occupied cell are left as they are.
fn legacy_board_after(before: &Board, record: &TurnRecord) -> Board {
    warn!(
        word = %record.word,
        row = record.start_row,
        col = record.start_col,
        direction = %record.direction,
        "Record has no post-turn board; re-deriving placements"
    );
    let mut board = before.clone();
    for (index, letter) in record.word.chars().enumerate() {
        let (row, col) = record
            .direction
            .offset(record.start_row, record.start_col, index);
        if !Board::within_bounds(row, col) || board.is_occupied(row, col) {
            continue;
        }
        let tile = if record.blank_indices.contains(&index) {
            Tile::blank(letter)
        } else {
            Tile::letter(letter)
        };
        board.set(row, col, tile);
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::scrabble::store::MemoryTurnStore;
    use crate::games::scrabble::tiles::TOTAL_TILES;

    fn ledger(players: usize) -> TurnLedger {
        TurnLedger::new("test", players, Arc::new(MemoryTurnStore::new()))
    }

    fn play(word: &str, row: usize, col: usize, direction: Direction) -> TurnData {
        TurnData::new(Play::new(word, row, col, direction), 10)
    }

    #[test]
    fn test_apply_writes_tiles_and_advances() {
        let mut ledger = ledger(2);
        let record = ledger.apply_turn(&play("CAT", 7, 7, Direction::Across)).unwrap();

        assert_eq!(record.player_index, 0);
        assert_eq!(ledger.board().tile_count(), 3);
        assert_eq!(ledger.bag().total(), TOTAL_TILES - 3);
        assert_eq!(ledger.scores(), &vec![10, 0]);
        assert_eq!(*ledger.current_player(), 1);
        assert_eq!(record.board_state_after.as_ref(), Some(ledger.board()));
    }

    #[test]
    fn test_reused_tiles_not_debited() {
        let mut ledger = ledger(2);
        ledger.apply_turn(&play("CAT", 7, 7, Direction::Across)).unwrap();
        ledger.apply_turn(&play("CATS", 7, 7, Direction::Across)).unwrap();
        assert_eq!(ledger.bag().total(), TOTAL_TILES - 4);
    }

    #[test]
    fn test_failed_apply_changes_nothing() {
        let mut ledger = ledger(2);
        ledger.apply_turn(&play("ZA", 7, 7, Direction::Across)).unwrap();
        let board = ledger.board().clone();
        let bag = ledger.bag().clone();

        let err = ledger.apply_turn(&play("ZZ", 8, 7, Direction::Across)).unwrap_err();
        assert!(matches!(err, LedgerError::Supply(_)));
        assert_eq!(ledger.board(), &board);
        assert_eq!(ledger.bag(), &bag);
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(*ledger.current_player(), 1);
    }

    #[test]
    fn test_apply_rejects_nothing_new() {
        let mut ledger = ledger(1);
        ledger.apply_turn(&play("CAT", 7, 7, Direction::Across)).unwrap();
        let err = ledger.apply_turn(&play("CAT", 7, 7, Direction::Across)).unwrap_err();
        assert_eq!(err, LedgerError::Placement(PlacementError::NoNewTiles));
    }

    #[tokio::test]
    async fn test_undo_on_empty_history_is_noop() {
        let mut ledger = ledger(2);
        assert!(!ledger.undo_last_turn().await.unwrap());
    }

    #[test]
    fn test_discard_last_restores_blank() {
        let mut ledger = ledger(2);
        let data = TurnData::new(
            Play::new("QI", 7, 7, Direction::Across).with_blanks([1]),
            11,
        );
        ledger.apply_turn(&data).unwrap();
        assert_eq!(ledger.bag().count(TileKind::Blank), 1);

        ledger.discard_last().unwrap();
        assert_eq!(ledger.bag(), &TileBag::standard());
        assert!(ledger.board().is_empty());
        assert_eq!(*ledger.current_player(), 0);
    }

    #[test]
    fn test_discard_after_replay_rebuilds_bag_from_prior_board() {
        let mut source = ledger(2);
        let mut record = source.apply_turn(&play("CAT", 7, 7, Direction::Across)).unwrap();
        let mut after = record.board_state_after.take().unwrap();
        after.set(0, 0, Tile::letter('X'));
        record.board_state_after = Some(after);

        let mut replayed =
            TurnLedger::replay("copy", 2, vec![record], Arc::new(MemoryTurnStore::new())).unwrap();
        assert_eq!(replayed.bag().total(), TOTAL_TILES - 4);

        replayed.discard_last().unwrap();
        assert!(replayed.board().is_empty());
        assert_eq!(replayed.bag(), &TileBag::standard());
        assert!(LedgerInvariants::check_all(&replayed).is_ok());
    }

    #[test]
    fn test_replay_rejects_unknown_seat() {
        let mut source = ledger(3);
        source.apply_turn(&play("CAT", 7, 7, Direction::Across)).unwrap();
        source.apply_turn(&play("AT", 7, 8, Direction::Down)).unwrap();
        source.apply_turn(&play("TO", 7, 9, Direction::Down)).unwrap();

        let err = TurnLedger::replay(
            "copy",
            2,
            source.records().clone(),
            Arc::new(MemoryTurnStore::new()),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::PlayerOutOfRange { player_index: 2, .. }));
    }
}
