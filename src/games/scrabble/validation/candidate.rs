//! Input to the validation pipeline.

use crate::games::scrabble::action::{PlacementError, Play};
use crate::games::scrabble::tiles::TileBag;
use crate::games::scrabble::types::{Board, Direction, Placement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// A proposed move together with the state it is checked against.
///
/// Fields are optional where a client may omit them; the boundary validator
/// reports anything missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCandidate {
    /// Word as entered. Empty means missing.
    #[serde(default)]
    pub word: String,
    /// Row of the first letter.
    #[serde(default)]
    pub start_row: Option<usize>,
    /// Column of the first letter.
    #[serde(default)]
    pub start_col: Option<usize>,
    /// Direction the word runs.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Board before the move.
    pub board_state: Board,
    /// Tiles left to draw from.
    pub tile_supply: TileBag,
    /// Tiles this move adds to the board.
    #[serde(default)]
    pub new_placements: Vec<Placement>,
    /// Word indices played with blanks.
    #[serde(default)]
    pub blank_indices: BTreeSet<usize>,
    /// Player submitting the move, if known.
    #[serde(default)]
    pub player_index: Option<usize>,
    /// Board the client claims results from the move, if it sent one.
    #[serde(default)]
    pub submitted_board: Option<Board>,
}

impl MoveCandidate {
    /// Builds a candidate from a play, deriving its new placements.
    ///
    /// A play that disagrees with the board yields no new placements; the
    /// word formation validator reports the conflict.
    #[instrument(skip(board, supply), fields(play = %play))]
    pub fn from_play(play: &Play, board: &Board, supply: &TileBag) -> Self {
        let new_placements = play.new_placements(board).unwrap_or_else(|e| {
            debug!(error = %e, "Play does not resolve against the board");
            Vec::new()
        });
        Self {
            word: play.word().clone(),
            start_row: Some(*play.start_row()),
            start_col: Some(*play.start_col()),
            direction: Some(*play.direction()),
            board_state: board.clone(),
            tile_supply: supply.clone(),
            new_placements,
            blank_indices: play.blank_indices().clone(),
            player_index: None,
            submitted_board: None,
        }
    }

    /// Names the player submitting the move.
    pub fn with_player(mut self, player_index: usize) -> Self {
        self.player_index = Some(player_index);
        self
    }

    /// Attaches the post-move board a client submitted.
    pub fn with_submitted_board(mut self, board: Board) -> Self {
        self.submitted_board = Some(board);
        self
    }

    /// The play described by this candidate.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MissingRequiredData`] naming the first
    /// absent field.
    pub fn play(&self) -> Result<Play, PlacementError> {
        if self.word.trim().is_empty() {
            return Err(PlacementError::MissingRequiredData { field: "word" });
        }
        let start_row = self
            .start_row
            .ok_or(PlacementError::MissingRequiredData { field: "startRow" })?;
        let start_col = self
            .start_col
            .ok_or(PlacementError::MissingRequiredData { field: "startCol" })?;
        let direction = self
            .direction
            .ok_or(PlacementError::MissingRequiredData { field: "direction" })?;
        Ok(Play::new(self.word.trim(), start_row, start_col, direction)
            .with_blanks(self.blank_indices.iter().copied()))
    }
}

/// Caller-supplied context passed through to every validator and issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationContext {
    /// Game the move belongs to.
    #[serde(default)]
    pub game_id: Option<String>,
    /// Player whose turn it is.
    #[serde(default)]
    pub active_player: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_play_derives_new_placements() {
        let play = Play::new("CAT", 7, 7, Direction::Across);
        let candidate = MoveCandidate::from_play(&play, &Board::new(), &TileBag::standard());
        assert_eq!(candidate.new_placements.len(), 3);
        assert_eq!(candidate.play().unwrap(), play);
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let mut candidate = MoveCandidate::from_play(
            &Play::new("CAT", 7, 7, Direction::Across),
            &Board::new(),
            &TileBag::standard(),
        );
        candidate.direction = None;
        assert_eq!(
            candidate.play(),
            Err(PlacementError::MissingRequiredData { field: "direction" })
        );
        candidate.word.clear();
        assert_eq!(
            candidate.play(),
            Err(PlacementError::MissingRequiredData { field: "word" })
        );
    }

    #[test]
    fn test_deserializes_input_contract() {
        let json = serde_json::json!({
            "word": "CAT",
            "startRow": 7,
            "startCol": 7,
            "direction": "across",
            "boardState": Board::new(),
            "tileSupply": TileBag::standard(),
            "blankIndices": [1]
        });
        let candidate: MoveCandidate = serde_json::from_value(json).unwrap();
        assert_eq!(candidate.direction, Some(Direction::Across));
        assert!(candidate.blank_indices.contains(&1));
        assert!(candidate.new_placements.is_empty());
    }
}
