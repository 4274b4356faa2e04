//! Built-in validators.
//!
//! Each validator checks one rule and reports structured data under its
//! registered name. They are pure over the candidate; the pipeline decides
//! what a failure means.

mod board_integrity;
mod boundary;
mod connection;
mod tile_availability;
mod turn_order;
mod word_formation;

pub use board_integrity::BoardIntegrityValidator;
pub use boundary::BoundaryValidator;
pub use connection::ConnectionValidator;
pub use tile_availability::{Shortage, TileAvailabilityValidator, required_tiles, shortages};
pub use turn_order::TurnOrderValidator;
pub use word_formation::{WordFormationValidator, find_sandwich};

/// Board bounds and required fields.
pub const BOUNDARY: &str = "boundary";
/// Center coverage or adjacency to existing tiles.
pub const CONNECTION: &str = "connection";
/// Enough tiles left in the bag.
pub const TILE_AVAILABILITY: &str = "tile_availability";
/// No sandwiching of an existing word.
pub const WORD_FORMATION: &str = "word_formation";
/// Acting player is the active player.
pub const TURN_ORDER: &str = "turn_order";
/// Client-submitted board matches the move.
pub const BOARD_INTEGRITY: &str = "board_integrity";

/// Validators run by the default pipeline, in order.
pub const DEFAULT_ORDER: [&str; 4] = [BOUNDARY, CONNECTION, TILE_AVAILABILITY, WORD_FORMATION];
