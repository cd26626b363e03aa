//! Game balance tables
//!
//! Every number that shapes combat lives here so a driver can load overrides
//! from JSON. Missing fields fall back to the defaults in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{EffectKind, EnemyKind, TowerKind};

/// Status effect a tower's projectiles attach on hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub kind: EffectKind,
    pub strength: f32,
    /// Seconds
    pub duration: f32,
}

/// Level-1 stats for a tower kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    pub damage: f32,
    pub range: f32,
    /// Attacks per second
    pub fire_rate: f32,
    pub base_cost: u32,
    pub projectile_speed: f32,
    pub on_hit: Option<EffectSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerTable {
    pub firewall: TowerStats,
    pub honeypot: TowerStats,
    pub jammer: TowerStats,
}

impl Default for TowerTable {
    fn default() -> Self {
        Self {
            // Baseline single-target damage
            firewall: TowerStats {
                damage: 15.0,
                range: 150.0,
                fire_rate: 2.0,
                base_cost: 50,
                projectile_speed: 300.0,
                on_hit: None,
            },
            honeypot: TowerStats {
                damage: 8.0,
                range: 130.0,
                fire_rate: 1.0,
                base_cost: 75,
                projectile_speed: 250.0,
                on_hit: Some(EffectSpec {
                    kind: EffectKind::Slow,
                    strength: 0.5,
                    duration: 2.0,
                }),
            },
            // Short full stuns, fired often
            jammer: TowerStats {
                damage: 5.0,
                range: 200.0,
                fire_rate: 3.0,
                base_cost: 100,
                projectile_speed: 400.0,
                on_hit: Some(EffectSpec {
                    kind: EffectKind::Stun,
                    strength: 1.0,
                    // Shorter than the cooldown at max level
                    duration: 0.15,
                }),
            },
        }
    }
}

impl TowerTable {
    pub fn get(&self, kind: TowerKind) -> &TowerStats {
        match kind {
            TowerKind::Firewall => &self.firewall,
            TowerKind::Honeypot => &self.honeypot,
            TowerKind::Jammer => &self.jammer,
        }
    }
}

/// How tower upgrades scale cost and stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeRules {
    pub cost_growth: f32,
    pub damage_mult: f32,
    pub range_mult: f32,
    pub fire_rate_mult: f32,
}

impl Default for UpgradeRules {
    fn default() -> Self {
        Self {
            cost_growth: UPGRADE_COST_GROWTH,
            damage_mult: UPGRADE_DAMAGE_MULT,
            range_mult: UPGRADE_RANGE_MULT,
            fire_rate_mult: UPGRADE_FIRE_RATE_MULT,
        }
    }
}

/// Base stats for an enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub max_health: f32,
    /// Pixels per second
    pub speed: f32,
    pub reward: u32,
    pub damage_to_base: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub data_crawler: EnemyStats,
    pub virus_bot: EnemyStats,
    pub trojan_horse: EnemyStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            data_crawler: EnemyStats {
                max_health: 50.0,
                speed: 80.0,
                reward: 10,
                damage_to_base: 5,
            },
            // Fast and fragile
            virus_bot: EnemyStats {
                max_health: 30.0,
                speed: 140.0,
                reward: 15,
                damage_to_base: 8,
            },
            // Slow tank
            trojan_horse: EnemyStats {
                max_health: 200.0,
                speed: 45.0,
                reward: 40,
                damage_to_base: 20,
            },
        }
    }
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::DataCrawler => &self.data_crawler,
            EnemyKind::VirusBot => &self.virus_bot,
            EnemyKind::TrojanHorse => &self.trojan_horse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub hit_radius: f32,
    pub max_travel: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            hit_radius: PROJECTILE_HIT_RADIUS,
            max_travel: PROJECTILE_MAX_TRAVEL,
        }
    }
}

impl ProjectileTuning {
    #[inline]
    pub fn hit_radius_sq(&self) -> f32 {
        self.hit_radius * self.hit_radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub starting_resources: u32,
    pub base_health: i32,
    /// Fraction of a tower's total investment returned on sale
    pub sell_refund: f32,
    pub grid_cell: f32,
    pub field_width: f32,
    pub field_height: f32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            starting_resources: STARTING_RESOURCES,
            base_health: STARTING_BASE_HEALTH,
            sell_refund: SELL_REFUND,
            grid_cell: GRID_CELL,
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
        }
    }
}

/// Wave pacing and composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub base_count: u32,
    pub count_per_wave: u32,
    /// Added health multiplier per wave after the first
    pub health_growth: f32,
    /// Seconds between spawns in wave 1
    pub spawn_interval: f32,
    /// Interval shrinks by this much per wave
    pub spawn_interval_step: f32,
    pub min_spawn_interval: f32,
    /// Countdown before the first wave
    pub first_breather_secs: f32,
    /// Countdown between waves
    pub breather_secs: f32,
    /// Resources and score per cleared wave, times the wave number
    pub wave_clear_bonus: u32,
    pub virus_unlock_wave: u32,
    pub trojan_unlock_wave: u32,
    /// Waypoints every enemy follows
    pub path: Vec<Vec2>,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_count: 4,
            count_per_wave: 2,
            health_growth: 0.15,
            spawn_interval: 1.2,
            spawn_interval_step: 0.05,
            min_spawn_interval: 0.4,
            first_breather_secs: 5.0,
            breather_secs: 8.0,
            wave_clear_bonus: 20,
            virus_unlock_wave: 3,
            trojan_unlock_wave: 5,
            path: vec![
                Vec2::new(0.0, 100.0),
                Vec2::new(700.0, 100.0),
                Vec2::new(700.0, 300.0),
                Vec2::new(100.0, 300.0),
                Vec2::new(100.0, 500.0),
                Vec2::new(800.0, 500.0),
            ],
        }
    }
}

impl WaveTuning {
    /// Enemy count for a 1-based wave number
    pub fn enemy_count(&self, wave: u32) -> u32 {
        self.base_count + wave * self.count_per_wave
    }

    pub fn spawn_interval_for(&self, wave: u32) -> f32 {
        (self.spawn_interval - wave.saturating_sub(1) as f32 * self.spawn_interval_step)
            .max(self.min_spawn_interval)
    }

    pub fn health_multiplier(&self, wave: u32) -> f32 {
        1.0 + self.health_growth * wave.saturating_sub(1) as f32
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub towers: TowerTable,
    pub enemies: EnemyTable,
    pub upgrades: UpgradeRules,
    pub projectiles: ProjectileTuning,
    pub economy: EconomyTuning,
    pub waves: WaveTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
