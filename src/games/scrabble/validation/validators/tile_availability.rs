//! Tile availability: the bag must cover every new tile.

use super::super::candidate::{MoveCandidate, ValidationContext};
use super::super::pipeline::{Validator, ValidatorOutcome};
use crate::games::scrabble::tiles::{TileBag, TileKind};
use crate::games::scrabble::types::Placement;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// One letter (or blank) the bag cannot cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortage {
    /// Letter, or `BLANK`.
    pub letter: String,
    /// Tiles the move needs.
    pub needed: u32,
    /// Tiles left in the bag.
    pub available: u32,
    /// `needed - available`.
    pub shortage: u32,
}

/// Counts tiles needed by new placements; blanks go in their own bucket.
pub fn required_tiles(placements: &[Placement]) -> BTreeMap<TileKind, u32> {
    let mut required = BTreeMap::new();
    for p in placements.iter().filter(|p| p.is_new) {
        *required.entry(TileKind::of(&p.tile())).or_insert(0) += 1;
    }
    required
}

/// Every bucket where `required` exceeds what `supply` holds.
pub fn shortages(required: &BTreeMap<TileKind, u32>, supply: &TileBag) -> Vec<Shortage> {
    required
        .iter()
        .filter_map(|(&kind, &needed)| {
            let available = supply.count(kind);
            (needed > available).then(|| Shortage {
                letter: kind.to_string(),
                needed,
                available,
                shortage: needed - available,
            })
        })
        .collect()
}

/// Fails if any letter or blank is short.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileAvailabilityValidator;

impl TileAvailabilityValidator {
    /// Synchronous check used by [`Validator::evaluate`].
    #[instrument(
        skip(candidate),
        fields(word = %candidate.word, new_tiles = candidate.new_placements.len())
    )]
    pub fn check(candidate: &MoveCandidate) -> ValidatorOutcome {
        let required = required_tiles(&candidate.new_placements);
        let short = shortages(&required, &candidate.tile_supply);
        let required_json: BTreeMap<String, u32> =
            required.iter().map(|(k, &n)| (k.to_string(), n)).collect();
        let data = json!({ "required": required_json, "shortages": short });

        if short.is_empty() {
            return ValidatorOutcome::pass_with(data);
        }
        debug!(shortages = short.len(), "Tile supply is short");
        let detail = short
            .iter()
            .map(|s| format!("{} (need {}, have {})", s.letter, s.needed, s.available))
            .collect::<Vec<_>>()
            .join(", ");
        ValidatorOutcome::fail_with(format!("Not enough tiles: {}", detail), data)
    }
}

#[async_trait::async_trait]
impl Validator for TileAvailabilityValidator {
    async fn evaluate(
        &self,
        candidate: &MoveCandidate,
        _context: &ValidationContext,
    ) -> anyhow::Result<ValidatorOutcome> {
        Ok(Self::check(candidate))
    }
}
