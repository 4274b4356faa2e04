//! Active player: the seat to act next exists.

use super::Invariant;
use crate::games::scrabble::ledger::TurnLedger;

/// Invariant: the current player indexes a seat.
pub struct ActivePlayerInRangeInvariant;

impl Invariant<TurnLedger> for ActivePlayerInRangeInvariant {
    fn holds(ledger: &TurnLedger) -> bool {
        *ledger.current_player() < ledger.scores().len()
    }

    fn description() -> &'static str {
        "Active player is one of the seated players"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::scrabble::action::Play;
    use crate::games::scrabble::ledger::TurnData;
    use crate::games::scrabble::store::MemoryTurnStore;
    use crate::games::scrabble::types::Direction;
    use std::sync::Arc;

    #[test]
    fn test_wraps_round_robin() {
        let mut ledger = TurnLedger::new("g", 1, Arc::new(MemoryTurnStore::new()));
        ledger
            .apply_turn(&TurnData::new(Play::new("CAT", 7, 7, Direction::Across), 10))
            .unwrap();
        assert_eq!(*ledger.current_player(), 0);
        assert!(ActivePlayerInRangeInvariant::holds(&ledger));
    }
}
