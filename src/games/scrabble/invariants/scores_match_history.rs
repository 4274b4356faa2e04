//! Score consistency: each seat's score is the sum of its recorded turns.

use super::Invariant;
use crate::games::scrabble::ledger::TurnLedger;

/// Invariant: per-seat scores equal the sum of that seat's turn scores.
pub struct ScoresMatchHistoryInvariant;

impl Invariant<TurnLedger> for ScoresMatchHistoryInvariant {
    fn holds(ledger: &TurnLedger) -> bool {
        let mut totals = vec![0i64; ledger.scores().len()];
        for record in ledger.records() {
            match totals.get_mut(record.player_index) {
                Some(total) => *total += i64::from(record.score),
                None => return false,
            }
        }
        totals
            .iter()
            .zip(ledger.scores())
            .all(|(&expected, &actual)| expected == i64::from(actual))
    }

    fn description() -> &'static str {
        "Each player's score equals the sum of their recorded turns"
    }
}
