//! Between-frame snapshots of engine state
//!
//! A snapshot holds what is needed to rebuild an equivalent engine: economy,
//! wave progress, and every enemy and tower. Projectiles in flight are not
//! kept; a restored engine starts with none.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effect::StatusEffect;
use super::enemy::{Enemy, EnemyId, EnemyKind};
use super::state::{Economy, GamePhase, GameState};
use super::tower::{Tower, TowerId, TowerKind};
use super::wave::WaveDirector;
use crate::error::SimError;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub path: Vec<Vec2>,
    pub path_index: usize,
    pub position: Vec2,
    pub health: f32,
    /// Wave-scaled max health
    pub max_health: f32,
    #[serde(default)]
    pub effects: Vec<StatusEffect>,
}

impl From<&Enemy> for EnemySnapshot {
    fn from(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id(),
            kind: enemy.kind(),
            path: enemy.path().to_vec(),
            path_index: enemy.path_index(),
            position: enemy.position(),
            health: enemy.health(),
            max_health: enemy.max_health(),
            effects: enemy.effects().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    pub id: TowerId,
    pub kind: TowerKind,
    pub position: Vec2,
    pub level: u8,
    #[serde(default)]
    pub target: Option<EnemyId>,
    #[serde(default)]
    pub last_fire: Option<f64>,
}

impl From<&Tower> for TowerSnapshot {
    fn from(tower: &Tower) -> Self {
        Self {
            id: tower.id(),
            kind: tower.kind(),
            position: tower.position(),
            level: tower.level(),
            target: tower.target(),
            last_fire: tower.last_fire(),
        }
    }
}

/// Serializable engine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: u64,
    pub phase: GamePhase,
    pub resume_phase: GamePhase,
    pub time: f64,
    pub frame: u64,
    pub economy: Economy,
    pub director: WaveDirector,
    pub next_id: u32,
    pub enemies: Vec<EnemySnapshot>,
    pub towers: Vec<TowerSnapshot>,
}

impl GameState {
    /// Capture the current state. Only call between frames.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed,
            phase: self.phase,
            resume_phase: self.resume_phase,
            time: self.time,
            frame: self.frame,
            economy: self.economy,
            director: self.director.clone(),
            next_id: self.next_id,
            enemies: self.enemies.iter().map(EnemySnapshot::from).collect(),
            towers: self.towers.iter().map(TowerSnapshot::from).collect(),
        }
    }

    /// Rebuild an engine from a snapshot taken with the same tuning
    pub fn restore(snapshot: Snapshot, tuning: Tuning) -> Result<Self, SimError> {
        let mut state = GameState::new(snapshot.seed, tuning);
        state.phase = snapshot.phase;
        state.resume_phase = snapshot.resume_phase;
        state.time = snapshot.time;
        state.frame = snapshot.frame;
        state.economy = snapshot.economy;
        state.director = snapshot.director;

        let mut highest_id = 0;
        for saved in snapshot.enemies {
            let mut stats = *state.tuning.enemies.get(saved.kind);
            stats.max_health = saved.max_health;
            let enemy = Enemy::restore(
                saved.id,
                saved.kind,
                saved.path,
                &stats,
                saved.position,
                saved.health,
                saved.path_index,
                saved.effects,
            )?;
            highest_id = highest_id.max(saved.id.0);
            state.enemies.push(enemy);
        }

        for saved in snapshot.towers {
            let mut tower = Tower::restore(
                saved.id,
                saved.kind,
                saved.position,
                saved.level,
                state.tuning.towers.get(saved.kind),
                state.tuning.upgrades,
            )?;
            tower.resume(saved.target, saved.last_fire);
            highest_id = highest_id.max(saved.id.0);
            state.towers.push(tower);
        }

        if snapshot.next_id <= highest_id {
            log::warn!(
                "Snapshot next_id {} collides with saved entities, bumping to {}",
                snapshot.next_id,
                highest_id + 1
            );
        }
        state.next_id = snapshot.next_id.max(highest_id + 1);
        state.normalize_order();

        log::info!(
            "Restored wave {} with {} enemies and {} towers",
            state.director.wave,
            state.enemies.len(),
            state.towers.len()
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    fn busy_state() -> GameState {
        let mut state = GameState::new(2024, Tuning::default());
        state
            .place_tower(TowerKind::Firewall, Vec2::new(300.0, 140.0))
            .unwrap();
        let upgraded = state
            .place_tower(TowerKind::Firewall, Vec2::new(500.0, 220.0))
            .unwrap();
        state.economy.resources = 500;
        state.upgrade_tower(upgraded).unwrap();

        let start = TickInput {
            start_wave: true,
            ..Default::default()
        };
        tick(&mut state, &start, 1.0 / 60.0);
        for _ in 0..240 {
            tick(&mut state, &TickInput::default(), 1.0 / 60.0);
        }
        state
    }

    #[test]
    fn test_snapshot_round_trip() {
        let state = busy_state();
        assert!(!state.enemies.is_empty());

        let snapshot = state.snapshot();
        let restored = GameState::restore(snapshot.clone(), Tuning::default()).unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.stats(), state.stats());
        assert!(restored.projectiles.is_empty());
        for (a, b) in restored.towers.iter().zip(&state.towers) {
            assert_eq!(a.level(), b.level());
            assert_eq!(a.total_investment(), b.total_investment());
            assert_eq!(a.damage(), b.damage());
        }
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = busy_state().snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_restored_engine_keeps_running() {
        let mut state = busy_state();
        let mut restored = GameState::restore(state.snapshot(), Tuning::default()).unwrap();
        state.projectiles.clear();

        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), 1.0 / 60.0);
            tick(&mut restored, &TickInput::default(), 1.0 / 60.0);
        }
        assert_eq!(restored.stats(), state.stats());
    }

    #[test]
    fn test_restore_rejects_empty_path() {
        let mut snapshot = busy_state().snapshot();
        snapshot.enemies[0].path.clear();
        assert_eq!(
            GameState::restore(snapshot, Tuning::default()).unwrap_err(),
            SimError::EmptyPath
        );
    }

    #[test]
    fn test_restore_bumps_stale_next_id() {
        let mut snapshot = busy_state().snapshot();
        snapshot.next_id = 1;
        let mut restored = GameState::restore(snapshot, Tuning::default()).unwrap();
        let id = restored.next_entity_id();
        assert!(restored.enemy(EnemyId(id)).is_none());
        assert!(restored.tower(TowerId(id)).is_none());
    }
}
