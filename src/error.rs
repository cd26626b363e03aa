//! Errors for entity construction and engine commands
//!
//! In-frame outcomes (no target, on cooldown, projectile miss) are not errors and
//! never surface here.

use thiserror::Error;

use crate::sim::TowerId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("enemy path must contain at least one waypoint")]
    EmptyPath,

    #[error("tower level {0} is outside 1..=5")]
    InvalidLevel(u8),

    #[error("path index {index} is past the end of a {len}-point path")]
    InvalidPathIndex { index: usize, len: usize },

    #[error("no tower with id {0:?}")]
    UnknownTower(TowerId),

    #[error("need {needed} resources, have {available}")]
    InsufficientResources { needed: u32, available: u32 },

    #[error("grid cell is already occupied")]
    CellOccupied,

    #[error("cannot build on the enemy path")]
    OnPath,

    #[error("position is outside the playfield")]
    OutOfBounds,

    #[error("tower is already at max level")]
    MaxLevel,

    #[error("game is over")]
    GameOver,
}
