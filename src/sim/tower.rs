//! Defensive towers
//!
//! Towers are placed once and never move. Each frame the engine validates a
//! tower's target, lets it acquire a new one, and asks it to fire. Kinds differ
//! in their stat table and in the status effect their shots carry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::within_radius;
use super::effect::StatusEffect;
use super::enemy::{Enemy, EnemyId};
use super::projectile::Projectile;
use crate::consts::{MAX_TOWER_LEVEL, MIN_TOWER_LEVEL};
use crate::error::SimError;
use crate::tuning::{EffectSpec, TowerStats, UpgradeRules};

/// Stable handle to a placed tower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(pub u32);

/// Tower types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Plain damage
    Firewall,
    /// Slows on hit
    Honeypot,
    /// Brief stun on hit
    Jammer,
}

impl TowerKind {
    pub const ALL: [TowerKind; 3] = [Self::Firewall, Self::Honeypot, Self::Jammer];

    pub fn name(&self) -> &'static str {
        match self {
            TowerKind::Firewall => "Firewall",
            TowerKind::Honeypot => "Honeypot",
            TowerKind::Jammer => "Jammer",
        }
    }

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            TowerKind::Firewall => 0xFF9800,
            TowerKind::Honeypot => 0xFFEB3B,
            TowerKind::Jammer => 0x03A9F4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tower {
    id: TowerId,
    kind: TowerKind,
    position: Vec2,
    level: u8,
    damage: f32,
    range: f32,
    /// Attacks per second
    fire_rate: f32,
    base_cost: u32,
    /// Base cost plus every upgrade paid
    total_investment: u32,
    projectile_speed: f32,
    on_hit: Option<EffectSpec>,
    upgrades: UpgradeRules,
    target: Option<EnemyId>,
    /// Simulation time (seconds) of the last shot
    last_fire: Option<f64>,
}

impl Tower {
    pub fn new(
        id: TowerId,
        kind: TowerKind,
        position: Vec2,
        stats: &TowerStats,
        upgrades: UpgradeRules,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            level: MIN_TOWER_LEVEL,
            damage: stats.damage,
            range: stats.range,
            fire_rate: stats.fire_rate,
            base_cost: stats.base_cost,
            total_investment: stats.base_cost,
            projectile_speed: stats.projectile_speed,
            on_hit: stats.on_hit,
            upgrades,
            target: None,
            last_fire: None,
        }
    }

    /// Rebuild a saved tower by replaying upgrades up to `level`
    pub fn restore(
        id: TowerId,
        kind: TowerKind,
        position: Vec2,
        level: u8,
        stats: &TowerStats,
        upgrades: UpgradeRules,
    ) -> Result<Self, SimError> {
        if !(MIN_TOWER_LEVEL..=MAX_TOWER_LEVEL).contains(&level) {
            return Err(SimError::InvalidLevel(level));
        }
        let mut tower = Self::new(id, kind, position, stats, upgrades);
        while tower.level < level {
            let cost = tower.upgrade_cost();
            tower.upgrade(cost);
        }
        Ok(tower)
    }

    #[inline]
    fn in_range(&self, enemy: &Enemy) -> bool {
        within_radius(self.position, enemy.position(), self.range)
    }

    #[inline]
    fn is_valid_target(&self, enemy: &Enemy) -> bool {
        enemy.is_alive() && self.in_range(enemy)
    }

    fn current_target<'a>(&self, enemies: &'a [Enemy]) -> Option<&'a Enemy> {
        let id = self.target?;
        enemies.iter().find(|e| e.id() == id)
    }

    /// Drop the target if it died, was pruned, or walked out of range
    pub fn update(&mut self, enemies: &[Enemy]) {
        let keep = self
            .current_target(enemies)
            .is_some_and(|e| self.is_valid_target(e));
        if !keep {
            self.target = None;
        }
    }

    /// Keep a still-valid target, otherwise pick one from `enemies`
    pub fn acquire_target(&mut self, enemies: &[Enemy]) -> Option<EnemyId> {
        if self
            .current_target(enemies)
            .is_some_and(|e| self.is_valid_target(e))
        {
            return self.target;
        }
        self.target = match self.kind {
            TowerKind::Firewall | TowerKind::Honeypot | TowerKind::Jammer => {
                self.nearest_in_range(enemies)
            }
        };
        self.target
    }

    /// Closest live enemy in range; ties go to the earliest in `enemies`
    fn nearest_in_range(&self, enemies: &[Enemy]) -> Option<EnemyId> {
        let range_sq = self.range * self.range;
        let mut best: Option<(f32, EnemyId)> = None;
        for enemy in enemies.iter().filter(|e| e.is_alive()) {
            let dist_sq = self.position.distance_squared(enemy.position());
            if dist_sq > range_sq {
                continue;
            }
            if best.is_none_or(|(d, _)| dist_sq < d) {
                best = Some((dist_sq, enemy.id()));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Seconds between shots
    #[inline]
    pub fn cooldown(&self) -> f64 {
        1.0 / self.fire_rate as f64
    }

    pub fn ready_to_fire(&self, now: f64) -> bool {
        self.last_fire
            .is_none_or(|last| now - last >= self.cooldown())
    }

    /// Launch a projectile at the current target if the cooldown has elapsed
    pub fn fire(&mut self, now: f64) -> Option<Projectile> {
        let target = self.target?;
        if !self.ready_to_fire(now) {
            return None;
        }
        self.last_fire = Some(now);
        Some(Projectile::new(
            self.id,
            self.position,
            target,
            self.damage,
            self.projectile_speed,
            self.on_hit.map(StatusEffect::from),
        ))
    }

    /// Price of the next level, 0 once maxed
    pub fn upgrade_cost(&self) -> u32 {
        if self.level >= MAX_TOWER_LEVEL {
            return 0;
        }
        (self.base_cost as f32 * self.upgrades.cost_growth.powi(self.level as i32)).round() as u32
    }

    /// Raise one level and record `cost_paid`. The caller settles resources.
    pub fn upgrade(&mut self, cost_paid: u32) -> bool {
        if self.level >= MAX_TOWER_LEVEL {
            return false;
        }
        self.level += 1;
        self.total_investment += cost_paid;
        self.damage *= self.upgrades.damage_mult;
        self.range *= self.upgrades.range_mult;
        self.fire_rate *= self.upgrades.fire_rate_mult;
        true
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_TOWER_LEVEL
    }

    pub fn id(&self) -> TowerId {
        self.id
    }

    pub fn kind(&self) -> TowerKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn fire_rate(&self) -> f32 {
        self.fire_rate
    }

    pub fn base_cost(&self) -> u32 {
        self.base_cost
    }

    pub fn total_investment(&self) -> u32 {
        self.total_investment
    }

    pub fn target(&self) -> Option<EnemyId> {
        self.target
    }

    pub fn last_fire(&self) -> Option<f64> {
        self.last_fire
    }

    /// Reinstate saved combat state after [`Tower::restore`]
    pub fn resume(&mut self, target: Option<EnemyId>, last_fire: Option<f64>) {
        self.target = target;
        self.last_fire = last_fire;
    }

    pub fn on_hit(&self) -> Option<&EffectSpec> {
        self.on_hit.as_ref()
    }
}
