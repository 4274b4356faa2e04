//! Persistence collaborator for applied turns.
//!
//! The engine never writes storage itself. A [`TurnStore`] receives each
//! applied turn and must confirm removal of the latest one before an undo
//! touches local state.

use super::ledger::TurnRecord;
use derive_more::{Display, Error};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum StoreError {
    /// The game has no stored turns.
    #[display("No stored turns for game '{}'", game_id)]
    NoTurns {
        /// Game that was addressed.
        game_id: String,
    },
    /// The backend could not be reached or refused the request.
    #[display("Turn store unavailable: {}", reason)]
    Unavailable {
        /// Backend detail.
        reason: String,
    },
}

/// Where applied turns are kept.
#[async_trait::async_trait]
pub trait TurnStore: Send + Sync {
    /// Appends a turn to the game's history.
    async fn save_turn(&self, game_id: &str, record: &TurnRecord) -> Result<(), StoreError>;

    /// Removes the latest turn of the game.
    async fn delete_last_turn(&self, game_id: &str) -> Result<(), StoreError>;
}

/// Turns held in process memory, keyed by game.
#[derive(Debug, Default)]
pub struct MemoryTurnStore {
    games: Mutex<HashMap<String, Vec<TurnRecord>>>,
}

impl MemoryTurnStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with one game's history.
    pub fn with_history(game_id: impl Into<String>, records: Vec<TurnRecord>) -> Self {
        let mut games = HashMap::new();
        games.insert(game_id.into(), records);
        Self {
            games: Mutex::new(games),
        }
    }

    /// Copy of a game's stored turns.
    pub async fn turns(&self, game_id: &str) -> Vec<TurnRecord> {
        self.games
            .lock()
            .await
            .get(game_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TurnStore for MemoryTurnStore {
    #[instrument(skip(self, record), fields(word = %record.word))]
    async fn save_turn(&self, game_id: &str, record: &TurnRecord) -> Result<(), StoreError> {
        let mut games = self.games.lock().await;
        let turns = games.entry(game_id.to_string()).or_default();
        turns.push(record.clone());
        debug!(stored = turns.len(), "Turn saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_last_turn(&self, game_id: &str) -> Result<(), StoreError> {
        let mut games = self.games.lock().await;
        match games.get_mut(game_id).and_then(|turns| turns.pop()) {
            Some(record) => {
                debug!(word = %record.word, "Stored turn deleted");
                Ok(())
            }
            None => Err(StoreError::NoTurns {
                game_id: game_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::scrabble::types::{Board, Direction};
    use std::collections::BTreeSet;

    fn record(word: &str) -> TurnRecord {
        TurnRecord {
            player_index: 0,
            word: word.to_string(),
            direction: Direction::Across,
            start_row: 7,
            start_col: 7,
            blank_indices: BTreeSet::new(),
            score: 0,
            board_state_before: Board::new(),
            board_state_after: None,
            player_score_before: 0,
        }
    }

    #[tokio::test]
    async fn test_save_then_delete() {
        let store = MemoryTurnStore::new();
        store.save_turn("g1", &record("CAT")).await.unwrap();
        store.save_turn("g1", &record("AT")).await.unwrap();

        store.delete_last_turn("g1").await.unwrap();
        let turns = store.turns("g1").await;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].word, "CAT");
    }

    #[tokio::test]
    async fn test_delete_from_empty_game_fails() {
        let store = MemoryTurnStore::new();
        let err = store.delete_last_turn("missing").await.unwrap_err();
        assert_eq!(
            err,
            StoreError::NoTurns {
                game_id: "missing".to_string()
            }
        );
    }
}
