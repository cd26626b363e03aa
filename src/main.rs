//! Datacenter Defense headless driver
//!
//! Plays a seeded run with a scripted defense, stepping the simulation through
//! a fixed-timestep accumulator, then prints the final save envelope.
//!
//! Usage: `datacenter-defense [TUNING_JSON|-] [SEED] [MAX_WAVES]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;
    use std::fs;

    use datacenter_defense::{SimError, Tuning};
    use datacenter_defense::consts::*;
    use datacenter_defense::persistence::SaveEnvelope;
    use datacenter_defense::sim::{EnemyKind, GameEvent, GameState, TickInput, TowerKind, tick};
    use glam::Vec2;

    /// Simulated render rate feeding the accumulator
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// Give up on runs that never end
    const MAX_FRAMES: u64 = 200_000;

    /// Cells the scripted player builds on, in order
    const BUILD_ORDER: [(TowerKind, f32, f32); 8] = [
        (TowerKind::Firewall, 300.0, 200.0),
        (TowerKind::Honeypot, 500.0, 200.0),
        (TowerKind::Jammer, 620.0, 200.0),
        (TowerKind::Firewall, 300.0, 400.0),
        (TowerKind::Firewall, 180.0, 200.0),
        (TowerKind::Honeypot, 500.0, 400.0),
        (TowerKind::Jammer, 180.0, 400.0),
        (TowerKind::Firewall, 620.0, 400.0),
    ];

    struct Game {
        state: GameState,
        accumulator: f32,
        input: TickInput,
        next_build: usize,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                state: GameState::new(seed, tuning),
                accumulator: 0.0,
                input: TickInput::default(),
                next_build: 0,
            }
        }

        /// Run simulation ticks for one rendered frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.start_wave = false;
                self.input.pause = false;

                self.handle_events();
                if self.state.is_over() {
                    break;
                }
            }
        }

        fn handle_events(&mut self) {
            let mut cleared = false;
            for event in &self.state.events {
                match *event {
                    GameEvent::WaveStarted { wave, enemies } => {
                        log::info!("Wave {} incoming: {} enemies", wave, enemies);
                    }
                    GameEvent::EnemySpawned { enemy, kind } => {
                        log::trace!("{:?} {} spawned (#{:06X})", enemy, kind.name(), kind.color());
                    }
                    GameEvent::EnemyLeaked { kind, damage, .. } => {
                        log::debug!("{} leaked for {} damage", kind.name(), damage);
                    }
                    GameEvent::WaveCleared { wave, bonus } => {
                        let stats = self.state.stats();
                        log::info!(
                            "Wave {} cleared (+{}): health {}, resources {}, score {}",
                            wave,
                            bonus,
                            stats.base_health,
                            stats.resources,
                            stats.score
                        );
                        cleared = true;
                    }
                    GameEvent::GameOver { wave, score } => {
                        log::warn!("Data center lost on wave {} with score {}", wave, score);
                    }
                    _ => {}
                }
            }
            if cleared || self.state.frame == 1 {
                self.spend();
            }
        }

        /// Build down the list, then upgrade the oldest tower that isn't maxed
        fn spend(&mut self) {
            while let Some(&(kind, x, y)) = BUILD_ORDER.get(self.next_build) {
                match self.state.place_tower(kind, Vec2::new(x, y)) {
                    Ok(_) => self.next_build += 1,
                    Err(SimError::InsufficientResources { .. }) => return,
                    Err(e) => {
                        log::warn!("Skipping build at ({}, {}): {}", x, y, e);
                        self.next_build += 1;
                    }
                }
            }
            loop {
                let Some(id) = self
                    .state
                    .towers
                    .iter()
                    .filter(|t| !t.is_max_level())
                    .min_by_key(|t| t.level())
                    .map(|t| t.id())
                else {
                    return;
                };
                if self.state.upgrade_tower(id).is_err() {
                    return;
                }
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next().as_deref() {
            None | Some("-") => Tuning::default(),
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&fs::read_to_string(path)?)?
            }
        };
        let seed: u64 = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(42);
        let max_waves: u32 = args.next().map(|s| s.parse::<u32>()).transpose()?.unwrap_or(10);

        log::info!("Datacenter Defense (headless) seed {} for {} waves", seed, max_waves);
        for kind in TowerKind::ALL {
            let stats = tuning.towers.get(kind);
            log::info!(
                "{} (#{:06X}): cost {}, damage {}, range {}, on hit {:?}",
                kind.name(),
                kind.color(),
                stats.base_cost,
                stats.damage,
                stats.range,
                stats.on_hit.map(|e| e.kind)
            );
        }
        for kind in EnemyKind::ALL {
            let stats = tuning.enemies.get(kind);
            log::debug!(
                "{} (#{:06X}): {} hp, speed {}, reward {}",
                kind.name(),
                kind.color(),
                stats.max_health,
                stats.speed,
                stats.reward
            );
        }
        let mut game = Game::new(seed, tuning);

        while !game.state.is_over() && game.state.frame < MAX_FRAMES {
            game.update(FRAME_DT);
            if game.state.director.wave > max_waves {
                break;
            }
        }

        let stats = game.state.stats();
        log::info!(
            "Finished at wave {} ({:?}): score {}, {} towers, {:.1}s simulated",
            stats.wave,
            stats.phase,
            stats.score,
            stats.towers,
            stats.time
        );
        println!("{}", SaveEnvelope::capture(&game.state).to_json()?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no browser driver
}
