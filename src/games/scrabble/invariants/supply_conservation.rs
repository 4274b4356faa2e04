//! Supply conservation: every tile is either in the bag or on the board.

use super::Invariant;
use crate::games::scrabble::ledger::TurnLedger;
use crate::games::scrabble::tiles::TOTAL_TILES;

/// Invariant: bag count plus board tiles equals the standard set.
pub struct SupplyConservationInvariant;

impl Invariant<TurnLedger> for SupplyConservationInvariant {
    fn holds(ledger: &TurnLedger) -> bool {
        ledger.bag().total() as usize + ledger.board().tile_count() == TOTAL_TILES as usize
    }

    fn description() -> &'static str {
        "Tiles in the bag plus tiles on the board equal the standard set"
    }
}
