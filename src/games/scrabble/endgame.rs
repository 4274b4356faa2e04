//! End-of-game score settlement.

use super::tiles::{TileBag, TileKind};
use super::types::Board;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Final adjustments for every seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Point value of every tile never played, credited to the ending player.
    pub bag_bonus: u32,
    /// Signed change applied to each seat.
    pub adjustments: Vec<i32>,
    /// Scores after the adjustments.
    pub final_scores: Vec<i32>,
}

/// Settlement input that does not describe the table.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SettlementError {
    /// The ending player is not seated.
    #[display("Ending player {} is not seated (table of {})", player, player_count)]
    UnknownPlayer {
        /// Offending seat.
        player: usize,
        /// Seats at the table.
        player_count: usize,
    },
    /// One rack per seat is required.
    #[display("Expected {} racks, got {}", expected, found)]
    RackCountMismatch {
        /// Seats at the table.
        expected: usize,
        /// Racks supplied.
        found: usize,
    },
}

/// Point value of a rack; blanks count zero.
pub fn rack_value(rack: &[TileKind]) -> u32 {
    rack.iter().map(|k| k.points()).sum()
}

/// Settles the game ended by `ending_player`.
///
/// The ending player gains the value of every unplayed tile, derived from
/// the board alone. Every other player loses the value of their rack. With
/// exactly two players the other player also loses the ending player's bonus.
///
/// # Errors
///
/// Returns [`SettlementError`] if the seat or rack count does not match
/// `scores`.
#[instrument(skip(board, racks, scores), fields(players = scores.len()))]
pub fn settle(
    board: &Board,
    ending_player: usize,
    racks: &[Vec<TileKind>],
    scores: &[i32],
) -> Result<Settlement, SettlementError> {
    let player_count = scores.len();
    if ending_player >= player_count {
        return Err(SettlementError::UnknownPlayer {
            player: ending_player,
            player_count,
        });
    }
    if racks.len() != player_count {
        return Err(SettlementError::RackCountMismatch {
            expected: player_count,
            found: racks.len(),
        });
    }

    let bag_bonus = TileBag::rebuild_from_board(board).point_value();
    let adjustments: Vec<i32> = racks
        .iter()
        .enumerate()
        .map(|(seat, rack)| {
            if seat == ending_player {
                bag_bonus as i32
            } else {
                let penalty = rack_value(rack) as i32;
                debug!(seat, penalty, "Rack deducted");
                if player_count == 2 {
                    -penalty - bag_bonus as i32
                } else {
                    -penalty
                }
            }
        })
        .collect();

    let final_scores = scores
        .iter()
        .zip(&adjustments)
        .map(|(score, delta)| score + delta)
        .collect::<Vec<_>>();

    info!(bag_bonus, ?final_scores, "Game settled");
    Ok(Settlement {
        bag_bonus,
        adjustments,
        final_scores,
    })
}
