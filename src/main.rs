//! Strictly Scrabble - Unified CLI
//!
//! Validates and scores moves, replays stored games, and settles final scores.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strictly_scrabble::{
    Board, Direction, EngineConfig, GameSession, MemoryTurnStore, MoveCandidate, Play, TileBag,
    TileKind, TurnRecord, ValidationContext, ValidationPipeline, score_play,
};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Validate {
            word,
            row,
            col,
            direction,
            blanks,
            board,
            pipeline,
        } => run_validate(&config, &word, row, col, direction, blanks, board, &pipeline).await,
        Command::Replay { records } => run_replay(&config, &records),
        Command::Settle {
            records,
            ending_player,
            racks,
        } => run_settle(&config, &records, ending_player, &racks),
    }
}

/// Validate and score one move
#[allow(clippy::too_many_arguments)]
#[instrument(skip(config, blanks, board))]
async fn run_validate(
    config: &EngineConfig,
    word: &str,
    row: usize,
    col: usize,
    direction: Direction,
    blanks: Vec<usize>,
    board: Option<PathBuf>,
    pipeline_name: &str,
) -> Result<()> {
    let board = match board {
        Some(path) => read_json::<Board>(&path)?,
        None => Board::new(),
    };
    let supply = TileBag::rebuild_from_board(&board);
    let play = Play::new(word, row, col, direction).with_blanks(blanks);

    let pipeline = ValidationPipeline::with_defaults(config.pipeline());
    let result = pipeline
        .run(
            pipeline_name,
            MoveCandidate::from_play(&play, &board, &supply),
            ValidationContext::default(),
        )
        .await?;

    let breakdown = play
        .placements(&board)
        .map(|placements| score_play(&board, &placements, direction))
        .ok();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "validation": result, "score": breakdown }))?
    );
    Ok(())
}

/// Rebuild a game and print board, scores and supply
#[instrument(skip(config))]
fn run_replay(config: &EngineConfig, records: &Path) -> Result<()> {
    let session = load_session(config, records)?;
    let ledger = session.ledger();

    println!("{}", ledger.board().display());
    for (seat, score) in ledger.scores().iter().enumerate() {
        println!("Player {}: {}", seat, score);
    }
    println!("Next to play: {}", ledger.current_player());
    let supply = ledger
        .bag()
        .remaining()
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(kind, n)| format!("{}={}", kind, n))
        .collect::<Vec<_>>()
        .join(" ");
    println!("Bag ({}): {}", ledger.bag().total(), supply);
    Ok(())
}

/// Replay a game, then settle it
#[instrument(skip(config, racks))]
fn run_settle(
    config: &EngineConfig,
    records: &Path,
    ending_player: usize,
    racks: &[String],
) -> Result<()> {
    let session = load_session(config, records)?;
    let mut parsed: Vec<Vec<TileKind>> =
        racks.iter().map(|r| parse_rack(r)).collect::<Result<_>>()?;
    parsed.resize(session.ledger().player_count(), Vec::new());

    let settlement = session.finish(ending_player, &parsed)?;
    println!("{}", serde_json::to_string_pretty(&settlement)?);
    Ok(())
}

fn load_session(config: &EngineConfig, path: &Path) -> Result<GameSession> {
    let records: Vec<TurnRecord> = read_json(path)?;
    info!(turns = records.len(), "Replaying game");
    let game_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "game".to_string());
    let store = Arc::new(MemoryTurnStore::with_history(game_id.clone(), records.clone()));
    let session = GameSession::from_records(
        game_id,
        config,
        Arc::new(ValidationPipeline::with_defaults(config.pipeline())),
        store,
        records,
    )?;
    Ok(session)
}

fn parse_rack(rack: &str) -> Result<Vec<TileKind>> {
    rack.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match TileKind::from_symbol(c) {
            Some(kind) => Ok(kind),
            None => bail!("'{}' is not a tile in rack '{}'", c, rack),
        })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "Reading JSON");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
