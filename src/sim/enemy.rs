//! Path-following enemies
//!
//! An enemy walks its waypoint list at its effective speed, takes damage from
//! projectiles and burns, and becomes terminal either by dying or by reaching
//! the end of its path. The engine prunes it the same frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effect::{EffectKind, StatusEffect};
use crate::consts::MIN_SPEED_FRACTION;
use crate::error::SimError;
use crate::step_toward;
use crate::tuning::EnemyStats;

/// Stable handle to an enemy in the engine's live set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    DataCrawler,
    VirusBot,
    TrojanHorse,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [Self::DataCrawler, Self::VirusBot, Self::TrojanHorse];

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::DataCrawler => "Data Crawler",
            EnemyKind::VirusBot => "Virus Bot",
            EnemyKind::TrojanHorse => "Trojan Horse",
        }
    }

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            EnemyKind::DataCrawler => 0x4CAF50,
            EnemyKind::VirusBot => 0xF44336,
            EnemyKind::TrojanHorse => 0x9C27B0,
        }
    }
}

/// A hostile unit walking toward the data center
#[derive(Debug, Clone)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    path: Vec<Vec2>,
    /// Index of the waypoint currently being walked toward
    path_index: usize,
    position: Vec2,
    health: f32,
    max_health: f32,
    /// Base speed in pixels/second
    speed: f32,
    reward: u32,
    damage_to_base: i32,
    effects: Vec<StatusEffect>,
    alive: bool,
}

impl Enemy {
    /// Spawn at the first waypoint with full health, walking toward the second.
    /// A one-point path is already complete.
    ///
    /// Fails with [`SimError::EmptyPath`] if `path` has no waypoints.
    pub fn new(
        id: EnemyId,
        kind: EnemyKind,
        path: Vec<Vec2>,
        stats: &EnemyStats,
    ) -> Result<Self, SimError> {
        let start = *path.first().ok_or(SimError::EmptyPath)?;
        Ok(Self {
            id,
            kind,
            path,
            path_index: 1,
            position: start,
            health: stats.max_health,
            max_health: stats.max_health,
            speed: stats.speed,
            reward: stats.reward,
            damage_to_base: stats.damage_to_base,
            effects: Vec::new(),
            alive: stats.max_health > 0.0,
        })
    }

    /// Rebuild an enemy from saved fields instead of a fresh spawn
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: EnemyId,
        kind: EnemyKind,
        path: Vec<Vec2>,
        stats: &EnemyStats,
        position: Vec2,
        health: f32,
        path_index: usize,
        effects: Vec<StatusEffect>,
    ) -> Result<Self, SimError> {
        let mut enemy = Self::new(id, kind, path, stats)?;
        enemy.set_path_index(path_index)?;
        enemy.set_position(position);
        enemy.health = health.clamp(0.0, enemy.max_health);
        enemy.alive = enemy.health > 0.0;
        enemy.effects = effects;
        Ok(enemy)
    }

    /// Advance one frame: status effects first, then movement
    pub fn update(&mut self, dt: f32) {
        self.apply_effects(dt);

        if !self.alive || self.has_reached_end() {
            return;
        }

        let waypoint = self.path[self.path_index];
        let move_distance = self.effective_speed() * dt;
        let (position, reached) = step_toward(self.position, waypoint, move_distance);
        self.position = position;
        if reached {
            // At most one waypoint per frame; leftover distance is dropped
            self.path_index += 1;
        }
    }

    fn apply_effects(&mut self, dt: f32) {
        let mut burn = Vec::new();
        for effect in &mut self.effects {
            if effect.kind() == EffectKind::Burn {
                burn.push(effect.strength() * dt);
            }
            effect.update(dt);
        }
        for amount in burn {
            self.take_damage(amount);
        }
        self.effects.retain(|e| !e.is_expired());
    }

    /// Base speed after status effects. Stun wins outright; slows multiply and
    /// are floored at 10% of base.
    pub fn effective_speed(&self) -> f32 {
        let mut speed = self.speed;
        for effect in &self.effects {
            match effect.kind() {
                EffectKind::Stun => return 0.0,
                EffectKind::Slow => speed *= 1.0 - effect.strength(),
                EffectKind::Burn => {}
            }
        }
        speed.max(self.speed * MIN_SPEED_FRACTION)
    }

    pub fn take_damage(&mut self, amount: f32) {
        if !self.alive {
            return;
        }
        self.health = (self.health - amount).min(self.max_health);
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
        }
    }

    /// Attach an effect; same-kind effects coexist
    pub fn add_status_effect(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub fn has_reached_end(&self) -> bool {
        self.path_index >= self.path.len()
    }

    pub fn health_percentage(&self) -> f32 {
        self.health / self.max_health
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind() == kind)
    }

    /// Persistence only; skips movement rules
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Persistence only; skips movement rules
    pub fn set_path_index(&mut self, index: usize) -> Result<(), SimError> {
        if index > self.path.len() {
            return Err(SimError::InvalidPathIndex {
                index,
                len: self.path.len(),
            });
        }
        self.path_index = index;
        Ok(())
    }

    pub fn id(&self) -> EnemyId {
        self.id
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    pub fn path_index(&self) -> usize {
        self.path_index
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn reward(&self) -> u32 {
        self.reward
    }

    pub fn damage_to_base(&self) -> i32 {
        self.damage_to_base
    }

    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}
