//! Word detection for a set of placements.
//!
//! The primary word runs along the play direction through every new tile.
//! Secondary words run across it, one per new tile, and only count when they
//! join the new tile to tiles that were already on the board.

use super::action::PlacementError;
use super::types::{Board, Direction, Placement, WordSpan};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument, trace};

/// Every word formed by a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedWords {
    /// The word along the play direction.
    pub primary: WordSpan,
    /// Cross words joined to existing tiles, in placement order.
    pub secondary: Vec<WordSpan>,
}

impl DetectedWords {
    /// Primary word followed by all secondary words.
    pub fn all(&self) -> impl Iterator<Item = &WordSpan> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }
}

/// Board with the new placements written over it.
fn scratch_board(board: &Board, new_tiles: &[Placement]) -> Board {
    let mut scratch = board.clone();
    for p in new_tiles {
        scratch.set(p.row, p.col, p.tile());
    }
    scratch
}

/// Traces the contiguous run through `(row, col)` along `direction`.
///
/// Scans back while cells are occupied to find the start, then forward to
/// collect the whole run. Tiles at coordinates in `new_cells` are marked new.
fn trace_run(
    scratch: &Board,
    row: usize,
    col: usize,
    direction: Direction,
    new_cells: &HashSet<(usize, usize)>,
    is_primary: bool,
) -> WordSpan {
    let (mut start_row, mut start_col) = (row, col);
    while let Some((r, c)) = direction.prev(start_row, start_col) {
        if !scratch.is_occupied(r, c) {
            break;
        }
        (start_row, start_col) = (r, c);
    }

    let mut tiles = Vec::new();
    let mut cursor = Some((start_row, start_col));
    while let Some((r, c)) = cursor {
        let Some(tile) = scratch.get(r, c) else {
            break;
        };
        tiles.push(Placement {
            row: r,
            col: c,
            letter: tile.letter,
            is_blank: tile.is_blank,
            word_index: tiles.len(),
            is_new: new_cells.contains(&(r, c)),
        });
        cursor = direction.next(r, c);
    }

    WordSpan {
        word: tiles.iter().map(|t| t.letter).collect(),
        direction,
        start_row,
        start_col,
        tiles,
        is_primary,
    }
}

/// Finds the primary word and all qualifying cross words.
///
/// Placements flagged `is_new == false` are ignored as inputs; existing
/// tiles are discovered by scanning the board.
///
/// # Errors
///
/// - [`PlacementError::NoNewTiles`] if no new placement lies on the board.
/// - [`PlacementError::NotCollinear`] if new tiles are not in one line.
/// - [`PlacementError::NotContiguous`] if the primary run has a gap.
/// - [`PlacementError::WordTooShort`] if the primary run has one tile.
#[instrument(
    skip(board, placements),
    fields(placements = placements.len(), direction = %direction)
)]
pub fn detect_words(
    board: &Board,
    placements: &[Placement],
    direction: Direction,
) -> Result<DetectedWords, PlacementError> {
    let new_tiles: Vec<Placement> = placements
        .iter()
        .filter(|p| p.is_new && Board::within_bounds(p.row, p.col))
        .copied()
        .collect();

    let Some(first) = new_tiles.first() else {
        return Err(PlacementError::NoNewTiles);
    };

    let line = direction.cross_axis(first.row, first.col);
    if new_tiles
        .iter()
        .any(|p| direction.cross_axis(p.row, p.col) != line)
    {
        return Err(PlacementError::NotCollinear);
    }

    let new_cells: HashSet<(usize, usize)> = new_tiles.iter().map(|p| (p.row, p.col)).collect();
    let scratch = scratch_board(board, &new_tiles);

    let main_coords = new_tiles.iter().map(|p| direction.main_axis(p.row, p.col));
    let min = main_coords.clone().min().unwrap_or_default();
    let max = main_coords.max().unwrap_or_default();

    let (row, col) = direction.cell(min, line);
    let primary = trace_run(&scratch, row, col, direction, &new_cells, true);

    let end = direction.main_axis(primary.start_row, primary.start_col) + primary.tiles.len() - 1;
    if end < max {
        debug!(end, max, "Primary run stops before the last new tile");
        return Err(PlacementError::NotContiguous);
    }
    if primary.tiles.len() < 2 {
        return Err(PlacementError::WordTooShort);
    }

    let mut seen: BTreeSet<(String, usize, usize, Direction)> = BTreeSet::new();
    seen.insert((
        primary.word.clone(),
        primary.start_row,
        primary.start_col,
        primary.direction,
    ));

    let cross = direction.perpendicular();
    let mut secondary = Vec::new();
    for p in &new_tiles {
        let span = trace_run(&scratch, p.row, p.col, cross, &new_cells, false);
        if span.tiles.len() < 2 {
            continue;
        }
        if span.tiles.iter().all(|t| t.is_new) {
            trace!(word = %span.word, "Discarding cross run made only of new tiles");
            continue;
        }
        let key = (span.word.clone(), span.start_row, span.start_col, span.direction);
        if seen.insert(key) {
            secondary.push(span);
        }
    }

    debug!(
        primary = %primary.word,
        secondary = secondary.len(),
        "Words detected"
    );
    Ok(DetectedWords { primary, secondary })
}
