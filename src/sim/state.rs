//! Game state and core simulation types
//!
//! `GameState` owns every live enemy, tower and projectile plus the economy.
//! Frame stepping lives in [`super::tick`]; this module holds the commands a
//! UI or wave director issues between frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::near_path;
use super::enemy::{Enemy, EnemyId, EnemyKind};
use super::projectile::Projectile;
use super::tower::{Tower, TowerId, TowerKind};
use super::wave::WaveDirector;
use crate::error::SimError;
use crate::snap_to_grid;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Countdown before the next wave; leftover enemies still fight
    Breather,
    /// Wave in progress
    Playing,
    /// Game is paused
    Paused,
    /// Data center destroyed
    GameOver,
}

/// Something that happened during the last frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted { wave: u32, enemies: u32 },
    EnemySpawned { enemy: EnemyId, kind: EnemyKind },
    EnemyKilled { enemy: EnemyId, kind: EnemyKind, reward: u32 },
    EnemyLeaked { enemy: EnemyId, kind: EnemyKind, damage: i32 },
    TowerFired { tower: TowerId, target: EnemyId },
    ProjectileHit { tower: TowerId, target: EnemyId, damage: f32 },
    ProjectileLost { tower: TowerId },
    WaveCleared { wave: u32, bonus: u32 },
    GameOver { wave: u32, score: u64 },
}

/// Player-side numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    pub resources: u32,
    /// Data center health; the game ends at 0
    pub base_health: i32,
    pub score: u64,
}

/// Read-only per-frame projection for HUD and telemetry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub wave: u32,
    pub resources: u32,
    pub base_health: i32,
    pub score: u64,
    pub phase: GamePhase,
    pub enemies_alive: usize,
    pub towers: usize,
    pub time: f64,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for wave composition
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    pub resume_phase: GamePhase,
    /// Simulation clock in seconds
    pub time: f64,
    /// Frames stepped
    pub frame: u64,
    pub economy: Economy,
    pub director: WaveDirector,
    /// Live enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Placed towers (sorted by id for determinism)
    pub towers: Vec<Tower>,
    /// Projectiles in flight
    pub projectiles: Vec<Projectile>,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    pub(crate) next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Breather,
            resume_phase: GamePhase::Breather,
            time: 0.0,
            frame: 0,
            economy: Economy {
                resources: tuning.economy.starting_resources,
                base_health: tuning.economy.base_health,
                score: 0,
            },
            director: WaveDirector::new(&tuning.waves),
            enemies: Vec::new(),
            towers: Vec::new(),
            projectiles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            wave: self.director.wave,
            resources: self.economy.resources,
            base_health: self.economy.base_health,
            score: self.economy.score,
            phase: self.phase,
            enemies_alive: self.enemies.iter().filter(|e| e.is_alive()).count(),
            towers: self.towers.len(),
            time: self.time,
        }
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id() == id)
    }

    /// Insert an enemy walking `path`. Call between frames.
    pub fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        path: Vec<Vec2>,
        health_multiplier: f32,
    ) -> Result<EnemyId, SimError> {
        let mut stats = *self.tuning.enemies.get(kind);
        stats.max_health *= health_multiplier;
        // Validate before burning an id
        if path.is_empty() {
            return Err(SimError::EmptyPath);
        }
        let id = EnemyId(self.next_entity_id());
        let enemy = Enemy::new(id, kind, path, &stats)?;
        self.enemies.push(enemy);
        log::debug!("Spawned {} {:?} ({:.0} hp)", kind.name(), id, stats.max_health);
        Ok(id)
    }

    /// Build a tower at the grid cell containing `pos`
    pub fn place_tower(&mut self, kind: TowerKind, pos: Vec2) -> Result<TowerId, SimError> {
        if self.is_over() {
            return Err(SimError::GameOver);
        }
        let economy = &self.tuning.economy;
        if pos.x < 0.0 || pos.y < 0.0 || pos.x >= economy.field_width || pos.y >= economy.field_height
        {
            return Err(SimError::OutOfBounds);
        }
        let cell = snap_to_grid(pos, economy.grid_cell);
        if self.towers.iter().any(|t| t.position() == cell) {
            return Err(SimError::CellOccupied);
        }
        if near_path(cell, &self.tuning.waves.path, economy.grid_cell / 2.0) {
            return Err(SimError::OnPath);
        }

        let stats = *self.tuning.towers.get(kind);
        if self.economy.resources < stats.base_cost {
            log::warn!(
                "Cannot afford {} ({} > {})",
                kind.name(),
                stats.base_cost,
                self.economy.resources
            );
            return Err(SimError::InsufficientResources {
                needed: stats.base_cost,
                available: self.economy.resources,
            });
        }

        self.economy.resources -= stats.base_cost;
        let id = TowerId(self.next_entity_id());
        self.towers
            .push(Tower::new(id, kind, cell, &stats, self.tuning.upgrades));
        log::info!("Placed {} {:?} at ({}, {})", kind.name(), id, cell.x, cell.y);
        Ok(id)
    }

    /// Pay for and apply one tower level. Returns the new level.
    pub fn upgrade_tower(&mut self, id: TowerId) -> Result<u8, SimError> {
        if self.is_over() {
            return Err(SimError::GameOver);
        }
        let tower = self
            .towers
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(SimError::UnknownTower(id))?;
        if tower.is_max_level() {
            return Err(SimError::MaxLevel);
        }
        let cost = tower.upgrade_cost();
        if self.economy.resources < cost {
            return Err(SimError::InsufficientResources {
                needed: cost,
                available: self.economy.resources,
            });
        }
        self.economy.resources -= cost;
        tower.upgrade(cost);
        log::info!("Upgraded {:?} to level {} for {}", id, tower.level(), cost);
        Ok(tower.level())
    }

    /// Remove a tower and refund part of what was spent on it
    pub fn sell_tower(&mut self, id: TowerId) -> Result<u32, SimError> {
        if self.is_over() {
            return Err(SimError::GameOver);
        }
        let index = self
            .towers
            .iter()
            .position(|t| t.id() == id)
            .ok_or(SimError::UnknownTower(id))?;
        let tower = self.towers.remove(index);
        let refund =
            (tower.total_investment() as f32 * self.tuning.economy.sell_refund).floor() as u32;
        self.economy.resources += refund;
        log::info!("Sold {:?} for {}", id, refund);
        Ok(refund)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id());
        self.towers.sort_by_key(|t| t.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, Tuning::default())
    }

    #[test]
    fn test_new_state() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Breather);
        assert_eq!(s.economy.resources, 150);
        assert_eq!(s.economy.base_health, 100);
        assert_eq!(s.director.wave, 0);
        assert!(s.enemies.is_empty() && s.towers.is_empty() && s.projectiles.is_empty());
    }

    #[test]
    fn test_place_tower_snaps_and_charges() {
        let mut s = state();
        let id = s.place_tower(TowerKind::Firewall, Vec2::new(405.0, 210.0)).unwrap();
        let tower = s.tower(id).unwrap();
        assert_eq!(tower.position(), Vec2::new(420.0, 220.0));
        assert_eq!(tower.level(), 1);
        assert_eq!(s.economy.resources, 100);
    }

    #[test]
    fn test_place_tower_rejections() {
        let mut s = state();
        assert_eq!(
            s.place_tower(TowerKind::Firewall, Vec2::new(-1.0, 10.0)),
            Err(SimError::OutOfBounds)
        );
        // Default path runs along y = 100
        assert_eq!(
            s.place_tower(TowerKind::Firewall, Vec2::new(300.0, 100.0)),
            Err(SimError::OnPath)
        );
        s.place_tower(TowerKind::Firewall, Vec2::new(405.0, 210.0)).unwrap();
        assert_eq!(
            s.place_tower(TowerKind::Honeypot, Vec2::new(410.0, 230.0)),
            Err(SimError::CellOccupied)
        );
        s.economy.resources = 20;
        assert_eq!(
            s.place_tower(TowerKind::Firewall, Vec2::new(500.0, 210.0)),
            Err(SimError::InsufficientResources {
                needed: 50,
                available: 20
            })
        );
        assert_eq!(s.towers.len(), 1);
    }

    #[test]
    fn test_upgrade_tower_charges_and_caps() {
        let mut s = state();
        s.economy.resources = 10_000;
        let id = s.place_tower(TowerKind::Firewall, Vec2::new(405.0, 210.0)).unwrap();
        let before = s.economy.resources;
        assert_eq!(s.upgrade_tower(id), Ok(2));
        assert_eq!(s.economy.resources, before - 75);
        assert_eq!(s.tower(id).unwrap().total_investment(), 125);

        for level in 3..=5 {
            assert_eq!(s.upgrade_tower(id), Ok(level));
        }
        let before = s.economy.resources;
        assert_eq!(s.upgrade_tower(id), Err(SimError::MaxLevel));
        assert_eq!(s.economy.resources, before);
    }

    #[test]
    fn test_upgrade_tower_needs_resources() {
        let mut s = state();
        let id = s.place_tower(TowerKind::Honeypot, Vec2::new(405.0, 210.0)).unwrap();
        s.economy.resources = 10;
        assert!(matches!(
            s.upgrade_tower(id),
            Err(SimError::InsufficientResources { .. })
        ));
        assert_eq!(s.tower(id).unwrap().level(), 1);
        assert_eq!(
            s.upgrade_tower(TowerId(999)),
            Err(SimError::UnknownTower(TowerId(999)))
        );
    }

    #[test]
    fn test_sell_tower_refunds_half() {
        let mut s = state();
        s.economy.resources = 1000;
        let id = s.place_tower(TowerKind::Firewall, Vec2::new(405.0, 210.0)).unwrap();
        s.upgrade_tower(id).unwrap();
        let before = s.economy.resources;
        assert_eq!(s.sell_tower(id), Ok(62));
        assert_eq!(s.economy.resources, before + 62);
        assert!(s.tower(id).is_none());
        assert_eq!(s.sell_tower(id), Err(SimError::UnknownTower(id)));
    }

    #[test]
    fn test_spawn_enemy_scales_health() {
        let mut s = state();
        let path = vec![Vec2::ZERO, Vec2::new(10.0, 0.0)];
        let id = s.spawn_enemy(EnemyKind::DataCrawler, path, 2.0).unwrap();
        let enemy = s.enemy(id).unwrap();
        assert_eq!(enemy.max_health(), 100.0);
        assert_eq!(enemy.health(), 100.0);

        assert_eq!(
            s.spawn_enemy(EnemyKind::VirusBot, Vec::new(), 1.0),
            Err(SimError::EmptyPath)
        );
        assert_eq!(s.enemies.len(), 1);
    }

    #[test]
    fn test_commands_rejected_after_game_over() {
        let mut s = state();
        s.phase = GamePhase::GameOver;
        assert_eq!(
            s.place_tower(TowerKind::Firewall, Vec2::new(405.0, 210.0)),
            Err(SimError::GameOver)
        );
    }
}
