//! Strictly Scrabble library - turn resolution for Scrabble-style games
//!
//! Resolves a proposed tile placement into a validated, scored turn and
//! keeps enough state to apply and exactly undo it.
//!
//! # Architecture
//!
//! - **Board / TileBag**: 15x15 grid, fixed bonus layout, tile inventory
//! - **Detector / Scoring**: words a move forms and what they are worth
//! - **Validation**: ordered, named validator pipelines
//! - **Ledger**: apply, undo, replay; persistence via [`TurnStore`]
//! - **Session**: one game behind a single facade
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_scrabble::{
//!     Direction, EngineConfig, GameSession, MemoryTurnStore, Play, SubmitOutcome,
//!     ValidationPipeline,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = EngineConfig::default();
//! let pipeline = Arc::new(ValidationPipeline::with_defaults(config.pipeline()));
//! let store = Arc::new(MemoryTurnStore::new());
//! let mut session = GameSession::new("game-1", &config, pipeline, store);
//!
//! let play = Play::new("CAT", 7, 7, Direction::Across);
//! if let SubmitOutcome::Applied { record, .. } = session.submit_turn(0, &play, None).await? {
//!     assert_eq!(record.score, 10);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig, GameConfig, MAX_PLAYERS, MIN_PLAYERS, PipelineConfig};

// Crate-level exports - Session
pub use session::{GameSession, SessionError, SubmitOutcome};

// Crate-level exports - Board and tiles
pub use games::scrabble::{
    BINGO_BONUS, BOARD_SIZE, BONUS_LAYOUT, Board, BonusSquare, CENTER, Direction, Placement,
    PlacementError, Play, SupplyError, TOTAL_TILES, Tile, TileBag, TileKind, WordSpan, bonus_at,
    letter_value,
};

// Crate-level exports - Word detection and scoring
pub use games::scrabble::{
    DetectedWords, ScoreBreakdown, WordScore, detect_words, score_play, score_word,
};

// Crate-level exports - Ledger, persistence and settlement
pub use games::scrabble::{
    Invariant, InvariantSet, InvariantViolation, LedgerError, LedgerInvariants, MemoryTurnStore,
    Settlement, SettlementError, StoreError, TurnData, TurnLedger, TurnRecord, TurnStore,
    rack_value, settle,
};

// Crate-level exports - Validation
pub use games::scrabble::validation::validators;
pub use games::scrabble::validation::{
    DEFAULT_PIPELINE, DEFAULT_VALIDATOR_TIMEOUT, MoveCandidate, PipelineDefinition, PipelineError,
    PipelineEvent, ResultMetadata, SUBMISSION_PIPELINE, Severity, ValidationContext,
    ValidationIssue, ValidationPipeline, ValidationResult, Validator, ValidatorMetadata,
    ValidatorOutcome,
};
