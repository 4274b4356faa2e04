//! First-class invariants for the turn ledger.
//!
//! Invariants are logical properties that must hold after every apply,
//! undo and replay. They are testable independently and document what the
//! ledger guarantees.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        collect(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        collect(violations)
    }
}

mod active_player;
mod scores_match_history;
mod supply_conservation;

pub use active_player::ActivePlayerInRangeInvariant;
pub use scores_match_history::ScoresMatchHistoryInvariant;
pub use supply_conservation::SupplyConservationInvariant;

/// All ledger invariants as a composable set.
pub type LedgerInvariants = (
    SupplyConservationInvariant,
    ScoresMatchHistoryInvariant,
    ActivePlayerInRangeInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::scrabble::action::Play;
    use crate::games::scrabble::ledger::{TurnData, TurnLedger};
    use crate::games::scrabble::store::MemoryTurnStore;
    use crate::games::scrabble::types::Direction;
    use std::sync::Arc;

    #[test]
    fn test_set_holds_for_new_ledger() {
        let ledger = TurnLedger::new("g", 2, Arc::new(MemoryTurnStore::new()));
        assert!(LedgerInvariants::check_all(&ledger).is_ok());
    }

    #[test]
    fn test_set_holds_after_turns() {
        let mut ledger = TurnLedger::new("g", 2, Arc::new(MemoryTurnStore::new()));
        let cat = TurnData::new(Play::new("CAT", 7, 7, Direction::Across), 10);
        let at = TurnData::new(Play::new("AT", 7, 8, Direction::Down), 2);
        ledger.apply_turn(&cat).unwrap();
        ledger.apply_turn(&at).unwrap();
        assert!(LedgerInvariants::check_all(&ledger).is_ok());
    }

    #[test]
    fn test_set_reports_each_violation() {
        let mut ledger = TurnLedger::new("g", 2, Arc::new(MemoryTurnStore::new()));
        ledger.scores_mut()[1] = 99;

        let violations = LedgerInvariants::check_all(&ledger).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].description,
            ScoresMatchHistoryInvariant::description()
        );
    }

    #[test]
    fn test_two_invariants_as_set() {
        let ledger = TurnLedger::new("g", 4, Arc::new(MemoryTurnStore::new()));
        type Pair = (SupplyConservationInvariant, ActivePlayerInRangeInvariant);
        assert!(Pair::check_all(&ledger).is_ok());
    }
}
