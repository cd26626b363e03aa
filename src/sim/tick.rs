//! Frame step
//!
//! Core game loop that advances the simulation by one frame. Order within a
//! frame is fixed: spawns, enemies, towers, projectiles, kill settlement, wave
//! bookkeeping. Nothing reads an entity that is halfway through its update.

use super::enemy::Enemy;
use super::state::{Economy, GameEvent, GamePhase, GameState};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    /// Skip the rest of the breather and send the next wave now
    pub start_wave: bool,
}

/// Advance the game state by `dt` seconds.
///
/// `dt` must be non-negative; drivers clamp long pauses before calling.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::Breather => {
                state.resume_phase = state.phase;
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = state.resume_phase;
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        _ => {}
    }

    state.frame += 1;
    state.time += dt as f64;

    match state.phase {
        GamePhase::Breather => {
            if input.start_wave || state.director.tick_breather(dt) {
                begin_wave(state);
            }
        }
        GamePhase::Playing => {
            // New enemies join before anything moves this frame
            if let Some(kind) = state.director.next_spawn(dt, &state.tuning.waves) {
                let path = state.tuning.waves.path.clone();
                let multiplier = state.director.health_multiplier(&state.tuning.waves);
                match state.spawn_enemy(kind, path, multiplier) {
                    Ok(enemy) => state.events.push(GameEvent::EnemySpawned { enemy, kind }),
                    Err(e) => log::warn!("Dropped {} spawn: {}", kind.name(), e),
                }
            }
        }
        _ => {}
    }

    update_enemies(state, dt);
    if state.is_over() {
        return;
    }
    update_towers(state);
    update_projectiles(state, dt);
    settle_kills(state);

    let wave_done = state.director.wave > 0
        && state.director.is_exhausted()
        && state.enemies.is_empty();
    if state.phase == GamePhase::Playing && wave_done {
        clear_wave(state);
    }
}

fn begin_wave(state: &mut GameState) {
    let enemies = state.director.begin_wave(state.seed, &state.tuning.waves);
    let wave = state.director.wave;
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::WaveStarted { wave, enemies });
    log::info!("Wave {} started with {} enemies", wave, enemies);
}

fn clear_wave(state: &mut GameState) {
    let wave = state.director.wave;
    let bonus = state.tuning.waves.wave_clear_bonus * wave;
    state.economy.resources += bonus;
    state.economy.score += bonus as u64;
    state.director.start_breather(&state.tuning.waves);
    state.phase = GamePhase::Breather;
    state.events.push(GameEvent::WaveCleared { wave, bonus });
    log::info!(
        "Wave {} cleared (+{}), resources {}, base {}",
        wave,
        bonus,
        state.economy.resources,
        state.economy.base_health
    );
}

/// Credit a dead enemy or charge a leaked one. Returns true if the base fell.
fn settle_enemy(enemy: &Enemy, economy: &mut Economy, events: &mut Vec<GameEvent>) -> bool {
    if !enemy.is_alive() {
        economy.resources += enemy.reward();
        economy.score += enemy.reward() as u64;
        events.push(GameEvent::EnemyKilled {
            enemy: enemy.id(),
            kind: enemy.kind(),
            reward: enemy.reward(),
        });
        log::debug!("{:?} destroyed (+{})", enemy.id(), enemy.reward());
    } else if enemy.has_reached_end() {
        economy.base_health -= enemy.damage_to_base();
        events.push(GameEvent::EnemyLeaked {
            enemy: enemy.id(),
            kind: enemy.kind(),
            damage: enemy.damage_to_base(),
        });
        log::debug!(
            "{:?} reached the data center (-{}), base {}",
            enemy.id(),
            enemy.damage_to_base(),
            economy.base_health
        );
        return economy.base_health <= 0;
    }
    false
}

#[inline]
fn is_terminal(enemy: &Enemy) -> bool {
    !enemy.is_alive() || enemy.has_reached_end()
}

/// Step 1: effects and movement, then prune dead and leaked enemies
fn update_enemies(state: &mut GameState, dt: f32) {
    let mut base_destroyed = false;
    for enemy in state.enemies.iter_mut() {
        enemy.update(dt);
        if settle_enemy(enemy, &mut state.economy, &mut state.events) {
            base_destroyed = true;
            break;
        }
    }
    // Enemies after the fatal leak were never touched and stay as they were
    state.enemies.retain(|e| !is_terminal(e));

    if base_destroyed {
        state.phase = GamePhase::GameOver;
        state.projectiles.clear();
        let wave = state.director.wave;
        let score = state.economy.score;
        state.events.push(GameEvent::GameOver { wave, score });
        log::info!("Data center destroyed on wave {} (score {})", wave, score);
    }
}

/// Step 2: target validation, acquisition and firing
fn update_towers(state: &mut GameState) {
    let mut fired = Vec::new();
    for tower in state.towers.iter_mut() {
        tower.update(&state.enemies);
        tower.acquire_target(&state.enemies);
        if let Some(projectile) = tower.fire(state.time) {
            log::trace!("{:?} fired at {:?}", tower.id(), projectile.target());
            state.events.push(GameEvent::TowerFired {
                tower: tower.id(),
                target: projectile.target(),
            });
            fired.push(projectile);
        }
    }
    state.projectiles.extend(fired);
}

/// Step 3: homing, hits, then drop resolved projectiles
fn update_projectiles(state: &mut GameState, dt: f32) {
    use super::projectile::Impact;

    for projectile in state.projectiles.iter_mut() {
        let target = state
            .enemies
            .iter_mut()
            .find(|e| e.id() == projectile.target());
        match projectile.update(dt, target, &state.tuning.projectiles) {
            Some(Impact::Hit { target, damage, .. }) => {
                state.events.push(GameEvent::ProjectileHit {
                    tower: projectile.source,
                    target,
                    damage,
                });
            }
            Some(Impact::TargetLost | Impact::Expired) => {
                state.events.push(GameEvent::ProjectileLost {
                    tower: projectile.source,
                });
            }
            None => {}
        }
    }
    state.projectiles.retain(|p| !p.has_resolved());
}

/// Credit enemies killed by this frame's hits so the economy is current
/// before observers read it
fn settle_kills(state: &mut GameState) {
    for enemy in state.enemies.iter().filter(|e| !e.is_alive()) {
        settle_enemy(enemy, &mut state.economy, &mut state.events);
    }
    state.enemies.retain(|e| e.is_alive());
}
