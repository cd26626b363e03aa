//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effect;
pub mod enemy;
pub mod projectile;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod tower;
pub mod wave;

pub use collision::{distance_to_segment_squared, near_path, within_radius};
pub use effect::{EffectKind, StatusEffect};
pub use enemy::{Enemy, EnemyId, EnemyKind};
pub use projectile::{Impact, Projectile};
pub use snapshot::{EnemySnapshot, Snapshot, TowerSnapshot};
pub use state::{Economy, GameEvent, GamePhase, GameState, GameStats};
pub use tick::{TickInput, tick};
pub use tower::{Tower, TowerId, TowerKind};
pub use wave::{WaveDirector, generate_wave};
