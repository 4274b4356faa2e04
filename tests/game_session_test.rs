//! Tests for a full game through the session facade.

use std::sync::Arc;
use strictly_scrabble::validators::{BOARD_INTEGRITY, TURN_ORDER};
use strictly_scrabble::{
    BINGO_BONUS, Board, Direction, EngineConfig, GameSession, LedgerError, MemoryTurnStore, Play,
    SessionError, StoreError, SubmitOutcome, TileBag, TileKind, TurnRecord, TurnStore,
    ValidationPipeline,
};

/// A store that accepts deletes but refuses every save.
struct ReadOnlyStore;

#[async_trait::async_trait]
impl TurnStore for ReadOnlyStore {
    async fn save_turn(&self, _game_id: &str, _record: &TurnRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable {
            reason: "read-only replica".to_string(),
        })
    }

    async fn delete_last_turn(&self, _game_id: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

fn new_session(store: Arc<dyn TurnStore>) -> GameSession {
    let config = EngineConfig::default();
    let pipeline = Arc::new(ValidationPipeline::with_defaults(config.pipeline()));
    GameSession::new("table-1", &config, pipeline, store)
}

/// Board a client would send after playing `play` on `board`.
fn board_after(board: &Board, play: &Play) -> Board {
    let mut value = serde_json::to_value(board).unwrap();
    for p in play.new_placements(board).unwrap() {
        value[p.row][p.col] =
            serde_json::json!({ "letter": p.letter.to_string(), "isBlank": p.is_blank });
    }
    serde_json::from_value(value).unwrap()
}

fn applied(outcome: SubmitOutcome) -> (TurnRecord, strictly_scrabble::ScoreBreakdown) {
    match outcome {
        SubmitOutcome::Applied { record, breakdown } => (record, breakdown),
        SubmitOutcome::Rejected(result) => panic!("turn rejected: {:?}", result.first_error()),
    }
}

#[tokio::test]
async fn test_first_move_cat_scores_ten() {
    let mut session = new_session(Arc::new(MemoryTurnStore::new()));
    let play = Play::new("CAT", 7, 7, Direction::Across);

    let (record, breakdown) = applied(session.submit_turn(0, &play, None).await.unwrap());
    assert_eq!(breakdown.main_word.word, "CAT");
    assert_eq!(breakdown.main_word.score, 10);
    assert!(breakdown.secondary_words.is_empty());
    assert_eq!(record.score, 10);
    assert_eq!(session.ledger().scores(), &vec![10, 0]);
}

#[tokio::test]
async fn test_seven_tile_play_earns_bingo() {
    let mut session = new_session(Arc::new(MemoryTurnStore::new()));
    let play = Play::new("RETAINS", 7, 4, Direction::Across);

    let (_, breakdown) = applied(session.submit_turn(0, &play, None).await.unwrap());
    assert_eq!(breakdown.new_placements.len(), 7);
    assert!(breakdown.secondary_words.is_empty());
    assert_eq!(breakdown.bingo_bonus, BINGO_BONUS);
    assert_eq!(breakdown.total(), breakdown.main_word.score + 50);
}

#[tokio::test]
async fn test_cross_words_scored_with_main_word() {
    let mut session = new_session(Arc::new(MemoryTurnStore::new()));
    applied(
        session
            .submit_turn(0, &Play::new("CAT", 7, 7, Direction::Across), None)
            .await
            .unwrap(),
    );

    // AT under CA also forms CA and AT down.
    let (_, breakdown) = applied(
        session
            .submit_turn(1, &Play::new("AT", 8, 7, Direction::Across), None)
            .await
            .unwrap(),
    );
    let mut words: Vec<&str> = breakdown
        .secondary_words
        .iter()
        .map(|w| w.word.as_str())
        .collect();
    words.sort_unstable();
    assert_eq!(breakdown.main_word.word, "AT");
    assert_eq!(words, vec!["AT", "CA"]);
}

#[tokio::test]
async fn test_player_out_of_turn_rejected() {
    let mut session = new_session(Arc::new(MemoryTurnStore::new()));
    let outcome = session
        .submit_turn(1, &Play::new("CAT", 7, 7, Direction::Across), None)
        .await
        .unwrap();

    let SubmitOutcome::Rejected(result) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(result.errors[0].validator_name, TURN_ORDER);
    assert!(session.ledger().records().is_empty());
}

#[tokio::test]
async fn test_tampered_board_rejected() {
    let mut session = new_session(Arc::new(MemoryTurnStore::new()));
    let hello = Play::new("HELLO", 7, 7, Direction::Across);
    let submitted = board_after(session.ledger().board(), &hello);
    applied(session.submit_turn(0, &hello, Some(submitted)).await.unwrap());

    // OWL down from the O of HELLO, with a stray X slipped into the corner.
    let owl = Play::new("OWL", 7, 11, Direction::Down);
    let honest = board_after(session.ledger().board(), &owl);
    let mut tampered = serde_json::to_value(&honest).unwrap();
    tampered[0][0] = serde_json::json!({ "letter": "X", "isBlank": false });
    let tampered: Board = serde_json::from_value(tampered).unwrap();

    let outcome = session.submit_turn(1, &owl, Some(tampered)).await.unwrap();
    let SubmitOutcome::Rejected(result) = outcome else {
        panic!("tampered board was accepted");
    };
    assert_eq!(result.errors[0].validator_name, BOARD_INTEGRITY);
    assert!(session.ledger().board().get(0, 0).is_none());

    applied(session.submit_turn(1, &owl, Some(honest)).await.unwrap());
    assert!(session.ledger().board().get(0, 0).is_none());
    assert_eq!(session.ledger().board().get(9, 11).unwrap().letter, 'L');
}

#[tokio::test]
async fn test_failed_save_rolls_back() {
    let mut session = new_session(Arc::new(ReadOnlyStore));
    let err = session
        .submit_turn(0, &Play::new("CAT", 7, 7, Direction::Across), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Store(StoreError::Unavailable { .. })));
    assert!(session.ledger().board().is_empty());
    assert_eq!(session.ledger().bag(), &TileBag::standard());
    assert_eq!(session.ledger().scores(), &vec![0, 0]);
    assert_eq!(*session.ledger().current_player(), 0);
}

#[tokio::test]
async fn test_undo_surfaces_divergence_distinctly() {
    struct NoDeletes;

    #[async_trait::async_trait]
    impl TurnStore for NoDeletes {
        async fn save_turn(&self, _: &str, _: &TurnRecord) -> Result<(), StoreError> {
            Ok(())
        }
        async fn delete_last_turn(&self, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable {
                reason: "timeout".to_string(),
            })
        }
    }

    let mut session = new_session(Arc::new(NoDeletes));
    applied(
        session
            .submit_turn(0, &Play::new("CAT", 7, 7, Direction::Across), None)
            .await
            .unwrap(),
    );

    let err = session.undo().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Ledger(LedgerError::PersistenceSyncFailure { .. })
    ));
    assert_eq!(session.ledger().records().len(), 1);
}

#[tokio::test]
async fn test_resume_and_settle() {
    let store = Arc::new(MemoryTurnStore::new());
    let mut session = new_session(store.clone());
    applied(
        session
            .submit_turn(0, &Play::new("QI", 7, 7, Direction::Across), None)
            .await
            .unwrap(),
    );
    applied(
        session
            .submit_turn(1, &Play::new("ZIT", 6, 8, Direction::Down), None)
            .await
            .unwrap(),
    );

    let config = EngineConfig::default();
    let resumed = GameSession::from_records(
        "table-1",
        &config,
        Arc::new(ValidationPipeline::default()),
        store.clone(),
        store.turns("table-1").await,
    )
    .unwrap();
    assert_eq!(resumed.ledger().board(), session.ledger().board());
    assert_eq!(resumed.ledger().scores(), session.ledger().scores());

    let racks = vec![vec![], vec![TileKind::Letter('K'), TileKind::Blank]];
    let settlement = resumed.finish(0, &racks).unwrap();
    // Standard set is worth 187; Q, I, Z and T are on the board.
    let bonus = 187 - 10 - 1 - 10 - 1;
    assert_eq!(settlement.bag_bonus, bonus);
    let scores = resumed.ledger().scores();
    assert_eq!(settlement.final_scores[0], scores[0] + bonus as i32);
    assert_eq!(settlement.final_scores[1], scores[1] - 5 - bonus as i32);
}
