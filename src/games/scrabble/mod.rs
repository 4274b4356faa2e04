//! Scrabble turn resolution.
//!
//! Leaves first: [`types`] and [`bonus`] describe the board, [`tiles`] the
//! supply, [`detector`] traces the words a move forms, [`scoring`] prices
//! them, [`validation`] decides legality, and [`ledger`] applies and undoes
//! turns. [`endgame`] settles the final scores.

pub mod action;
pub mod bonus;
pub mod detector;
pub mod endgame;
pub mod invariants;
pub mod ledger;
pub mod scoring;
pub mod store;
pub mod tiles;
pub mod types;
pub mod validation;

pub use action::{PlacementError, Play};
pub use bonus::{BONUS_LAYOUT, BonusSquare, bonus_at};
pub use detector::{DetectedWords, detect_words};
pub use endgame::{Settlement, SettlementError, rack_value, settle};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, LedgerInvariants};
pub use ledger::{LedgerError, TurnData, TurnLedger, TurnRecord};
pub use scoring::{BINGO_BONUS, ScoreBreakdown, WordScore, score_play, score_word};
pub use store::{MemoryTurnStore, StoreError, TurnStore};
pub use tiles::{SupplyError, TOTAL_TILES, TileBag, TileKind, letter_value};
pub use types::{BOARD_SIZE, Board, CENTER, Direction, Placement, Tile, WordSpan};
