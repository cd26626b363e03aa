//! Datacenter Defense - combat core for a network-themed tower defense game
//!
//! Core modules:
//! - `sim`: Deterministic frame-stepped simulation (enemies, towers, projectiles, waves)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Versioned save envelope around engine snapshots
//! - `error`: Command and construction errors

pub mod error;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta a driver should feed the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Tower level bounds
    pub const MIN_TOWER_LEVEL: u8 = 1;
    pub const MAX_TOWER_LEVEL: u8 = 5;

    /// Upgrade cost grows as base_cost * GROWTH^level
    pub const UPGRADE_COST_GROWTH: f32 = 1.5;
    /// Per-level stat multipliers
    pub const UPGRADE_DAMAGE_MULT: f32 = 1.2;
    pub const UPGRADE_RANGE_MULT: f32 = 1.1;
    pub const UPGRADE_FIRE_RATE_MULT: f32 = 1.2;

    /// Enemies never drop below this fraction of base speed from slows
    pub const MIN_SPEED_FRACTION: f32 = 0.1;

    /// Projectile hit radius (pixels); compared squared
    pub const PROJECTILE_HIT_RADIUS: f32 = 10.0;
    /// Projectile gives up after travelling this far
    pub const PROJECTILE_MAX_TRAVEL: f32 = 1000.0;

    /// Economy
    pub const STARTING_RESOURCES: u32 = 150;
    pub const STARTING_BASE_HEALTH: i32 = 100;
    pub const SELL_REFUND: f32 = 0.5;

    /// Placement grid
    pub const GRID_CELL: f32 = 40.0;
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
}

/// Snap a point to the center of the grid cell that contains it
#[inline]
pub fn snap_to_grid(pos: Vec2, cell: f32) -> Vec2 {
    (pos / cell).floor() * cell + Vec2::splat(cell / 2.0)
}

/// Move `from` toward `to` by at most `max_step`.
///
/// Returns the new position and whether `to` was reached. Reaching snaps exactly
/// onto `to`; leftover distance is discarded.
#[inline]
pub fn step_toward(from: Vec2, to: Vec2, max_step: f32) -> (Vec2, bool) {
    let delta = to - from;
    let remaining = delta.length();
    if max_step >= remaining {
        (to, true)
    } else {
        (from + delta / remaining * max_step, false)
    }
}
