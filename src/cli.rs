//! Command-line interface for strictly_scrabble.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_scrabble::Direction;

/// Strictly Scrabble - turn resolution engine
#[derive(Parser, Debug)]
#[command(name = "strictly_scrabble")]
#[command(about = "Validate, score, replay and settle Scrabble turns", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate and score a move against a board
    Validate {
        /// Word to play
        word: String,

        /// Row of the first letter
        #[arg(long)]
        row: usize,

        /// Column of the first letter
        #[arg(long)]
        col: usize,

        /// Direction the word runs (across or down)
        #[arg(short, long, default_value = "across")]
        direction: Direction,

        /// Word indices played with blank tiles
        #[arg(long, value_delimiter = ',')]
        blanks: Vec<usize>,

        /// Board JSON file (15x15 array of null or {letter, isBlank}); empty board if omitted
        #[arg(long)]
        board: Option<PathBuf>,

        /// Pipeline to run
        #[arg(long, default_value = "default")]
        pipeline: String,
    },

    /// Rebuild a game from a turn-record JSON file and print its state
    Replay {
        /// Turn records, oldest first
        records: PathBuf,
    },

    /// Replay a game, then settle final scores
    Settle {
        /// Turn records, oldest first
        records: PathBuf,

        /// Player who ended the game
        #[arg(long)]
        ending_player: usize,

        /// Rack of each player in seat order, as letters with '?' for a blank
        #[arg(long = "rack")]
        racks: Vec<String>,
    },
}
